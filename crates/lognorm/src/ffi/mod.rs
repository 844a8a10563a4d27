//! [`Engine`] backed by the system liblognorm.

mod sys;

use std::{
    ffi::{c_char, c_int, c_void, CStr, CString},
    marker::PhantomData,
    path::Path,
    ptr::{self, NonNull},
    slice,
};

use tracing::warn;

use crate::{
    engine::{Engine, NodeKind, ValueNode},
    status, LastError,
};

/// A liblognorm context (`ln_ctx`).
pub struct Liblognorm {
    ctx: NonNull<sys::ln_ctx_s>,
    // Boxed so the cookie handed to liblognorm keeps a stable address.
    sink: Option<Box<LastError>>,
}

// SAFETY: an `ln_ctx` is not tied to the thread that created it. All access
// goes through `&mut self`, so it is never used from two threads at once.
unsafe impl Send for Liblognorm {}

impl Engine for Liblognorm {
    type Node<'a> = JsonRef<'a>;

    fn create() -> Option<Self> {
        // SAFETY: no preconditions; returns NULL on allocation failure.
        let ctx = unsafe { sys::ln_initCtx() };
        NonNull::new(ctx).map(|ctx| Self { ctx, sink: None })
    }

    fn set_error_callback(&mut self, sink: LastError) {
        let sink = Box::new(sink);
        let cookie = &*sink as *const LastError as *mut c_void;
        // SAFETY: `cookie` points into a box owned by `self` that outlives the
        // context: the previous box is only dropped after the new callback is
        // installed, and `Drop` exits the context before fields are dropped.
        unsafe {
            sys::ln_setErrMsgCB(self.ctx.as_ptr(), Some(error_callback), cookie);
        }
        self.sink = Some(sink);
    }

    fn load_samples(&mut self, path: &Path) -> i32 {
        let Some(path) = path_to_cstring(path) else {
            warn!(path = %path.display(), "rulebase path is not representable as a C string");
            return status::BADCONFIG;
        };
        // SAFETY: `self.ctx` is live and `path` is NUL-terminated.
        unsafe { sys::ln_loadSamples(self.ctx.as_ptr(), path.as_ptr()) }
    }

    fn load_samples_from_string(&mut self, rules: &str) -> i32 {
        let Ok(rules) = CString::new(rules) else {
            return status::BADCONFIG;
        };
        // SAFETY: `self.ctx` is live and `rules` is NUL-terminated.
        unsafe { sys::ln_loadSamplesFromString(self.ctx.as_ptr(), rules.as_ptr()) }
    }

    fn normalize(&mut self, input: &[u8]) -> (i32, Option<JsonRef<'_>>) {
        let mut json: *mut sys::fjson_object = ptr::null_mut();
        // SAFETY: `input` is valid for `input.len()` bytes and `json` is a
        // valid out-pointer. The result stays owned by liblognorm.
        let code = unsafe {
            sys::ln_normalize(
                self.ctx.as_ptr(),
                input.as_ptr() as *const c_char,
                input.len(),
                &mut json,
            )
        };
        (code, NonNull::new(json).map(JsonRef::new))
    }

    fn version() -> String {
        // SAFETY: returns a static NUL-terminated string.
        let raw = unsafe { sys::ln_version() };
        if raw.is_null() {
            return String::new();
        }
        // SAFETY: checked non-null above.
        unsafe { CStr::from_ptr(raw) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for Liblognorm {
    fn drop(&mut self) {
        // SAFETY: `self.ctx` was returned by `ln_initCtx` and is released once.
        unsafe {
            sys::ln_exitCtx(self.ctx.as_ptr());
        }
    }
}

unsafe extern "C" fn error_callback(cookie: *mut c_void, msg: *const c_char, len: usize) {
    if cookie.is_null() || msg.is_null() {
        return;
    }
    // SAFETY: `cookie` is the `LastError` registered in `set_error_callback`,
    // and liblognorm passes `len` readable bytes at `msg`.
    let sink = unsafe { &*(cookie as *const LastError) };
    let message = unsafe { slice::from_raw_parts(msg as *const u8, len) };
    sink.record(message);
}

#[cfg(unix)]
fn path_to_cstring(path: &Path) -> Option<CString> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(path.as_os_str().as_bytes()).ok()
}

#[cfg(not(unix))]
fn path_to_cstring(path: &Path) -> Option<CString> {
    CString::new(path.to_str()?).ok()
}

/// Borrowed libfastjson value owned by a [`Liblognorm`] context.
#[derive(Clone, Copy)]
pub struct JsonRef<'a> {
    ptr: NonNull<sys::fjson_object>,
    _engine: PhantomData<&'a Liblognorm>,
}

impl<'a> JsonRef<'a> {
    fn new(ptr: NonNull<sys::fjson_object>) -> Self {
        Self {
            ptr,
            _engine: PhantomData,
        }
    }
}

impl<'a> ValueNode<'a> for JsonRef<'a> {
    type Entries = JsonEntries<'a>;

    fn kind(self) -> NodeKind {
        // SAFETY (all accessors below): `ptr` is a live object owned by the
        // engine for `'a`.
        match unsafe { sys::fjson_object_get_type(self.ptr.as_ptr()) } {
            sys::FJSON_TYPE_NULL => NodeKind::Null,
            sys::FJSON_TYPE_BOOLEAN => NodeKind::Boolean,
            sys::FJSON_TYPE_DOUBLE => NodeKind::Double,
            sys::FJSON_TYPE_INT => NodeKind::Int,
            sys::FJSON_TYPE_OBJECT => NodeKind::Object,
            sys::FJSON_TYPE_ARRAY => NodeKind::Array,
            sys::FJSON_TYPE_STRING => NodeKind::String,
            _ => NodeKind::Unknown,
        }
    }

    fn as_bool(self) -> bool {
        unsafe { sys::fjson_object_get_boolean(self.ptr.as_ptr()) != 0 }
    }

    fn as_f64(self) -> f64 {
        unsafe { sys::fjson_object_get_double(self.ptr.as_ptr()) }
    }

    fn as_i64(self) -> i64 {
        unsafe { sys::fjson_object_get_int64(self.ptr.as_ptr()) }
    }

    fn as_bytes(self) -> &'a [u8] {
        let raw = unsafe { sys::fjson_object_get_string(self.ptr.as_ptr()) };
        if raw.is_null() {
            return &[];
        }
        // Field values may carry NUL bytes from the input, so the length comes
        // from the object rather than from a terminator scan.
        let len = unsafe { sys::fjson_object_get_string_len(self.ptr.as_ptr()) };
        let len = usize::try_from(len).unwrap_or(0);
        // SAFETY: fastjson keeps `len` initialized bytes at `raw` for as long
        // as the object lives, which is at least `'a`.
        unsafe { slice::from_raw_parts(raw as *const u8, len) }
    }

    fn array_len(self) -> usize {
        let len = unsafe { sys::fjson_object_array_length(self.ptr.as_ptr()) };
        usize::try_from(len).unwrap_or(0)
    }

    fn array_get(self, index: usize) -> Option<Self> {
        let index = c_int::try_from(index).ok()?;
        let item = unsafe { sys::fjson_object_array_get_idx(self.ptr.as_ptr(), index) };
        NonNull::new(item).map(JsonRef::new)
    }

    fn entries(self) -> JsonEntries<'a> {
        let (it, end) = unsafe {
            (
                sys::fjson_object_iter_begin(self.ptr.as_ptr()),
                sys::fjson_object_iter_end(self.ptr.as_ptr()),
            )
        };
        JsonEntries {
            it,
            end,
            _engine: PhantomData,
        }
    }
}

/// Begin/end iterator walk over the members of a [`JsonRef`] object.
pub struct JsonEntries<'a> {
    it: sys::fjson_object_iterator,
    end: sys::fjson_object_iterator,
    _engine: PhantomData<&'a Liblognorm>,
}

impl<'a> Iterator for JsonEntries<'a> {
    type Item = (&'a [u8], Option<JsonRef<'a>>);

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: both iterators come from the same live object.
        unsafe {
            if sys::fjson_object_iter_equal(&self.it, &self.end) != 0 {
                return None;
            }
            let name = sys::fjson_object_iter_peek_name(&self.it);
            let value = sys::fjson_object_iter_peek_value(&self.it);
            sys::fjson_object_iter_next(&mut self.it);
            let key = if name.is_null() {
                &[][..]
            } else {
                CStr::from_ptr(name).to_bytes()
            };
            Some((key, NonNull::new(value).map(JsonRef::new)))
        }
    }
}
