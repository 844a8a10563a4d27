use super::*;
use serde_json::json;

mod support;
use support::*;


type FakeContext = Context<FakeEngine>;

fn fresh() -> (FakeContext, Probe) {
    let probe = arm(Setup::default());
    let ctx = FakeContext::new().expect("context");
    (ctx, probe)
}
