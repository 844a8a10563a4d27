//! Raw declarations for liblognorm and libfastjson.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_void};

#[repr(C)]
pub struct ln_ctx_s {
    _private: [u8; 0],
}

pub type ln_ctx = *mut ln_ctx_s;

#[repr(C)]
pub struct fjson_object {
    _private: [u8; 0],
}

/// Mirrors `struct fjson_object_iterator`; only ever handled by value.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct fjson_object_iterator {
    objs: *const fjson_object,
    curr_idx: c_int,
    pg: *const c_void,
}

pub type fjson_type = c_int;

pub const FJSON_TYPE_NULL: fjson_type = 0;
pub const FJSON_TYPE_BOOLEAN: fjson_type = 1;
pub const FJSON_TYPE_DOUBLE: fjson_type = 2;
pub const FJSON_TYPE_INT: fjson_type = 3;
pub const FJSON_TYPE_OBJECT: fjson_type = 4;
pub const FJSON_TYPE_ARRAY: fjson_type = 5;
pub const FJSON_TYPE_STRING: fjson_type = 6;

pub type ln_err_msg_cb = unsafe extern "C" fn(cookie: *mut c_void, msg: *const c_char, len: usize);

#[link(name = "lognorm")]
extern "C" {
    pub fn ln_version() -> *const c_char;
    pub fn ln_initCtx() -> ln_ctx;
    pub fn ln_exitCtx(ctx: ln_ctx) -> c_int;
    pub fn ln_setErrMsgCB(ctx: ln_ctx, cb: Option<ln_err_msg_cb>, cookie: *mut c_void) -> c_int;
    pub fn ln_loadSamples(ctx: ln_ctx, file: *const c_char) -> c_int;
    pub fn ln_loadSamplesFromString(ctx: ln_ctx, string: *const c_char) -> c_int;
    pub fn ln_normalize(
        ctx: ln_ctx,
        str_: *const c_char,
        str_len: usize,
        json_p: *mut *mut fjson_object,
    ) -> c_int;
}

#[link(name = "fastjson")]
extern "C" {
    pub fn fjson_object_get_type(obj: *const fjson_object) -> fjson_type;
    pub fn fjson_object_get_boolean(obj: *const fjson_object) -> c_int;
    pub fn fjson_object_get_double(obj: *const fjson_object) -> f64;
    pub fn fjson_object_get_int64(obj: *const fjson_object) -> i64;
    pub fn fjson_object_get_string(obj: *mut fjson_object) -> *const c_char;
    pub fn fjson_object_get_string_len(obj: *mut fjson_object) -> c_int;
    pub fn fjson_object_array_length(obj: *mut fjson_object) -> c_int;
    pub fn fjson_object_array_get_idx(obj: *mut fjson_object, idx: c_int) -> *mut fjson_object;
    pub fn fjson_object_iter_begin(obj: *mut fjson_object) -> fjson_object_iterator;
    pub fn fjson_object_iter_end(obj: *const fjson_object) -> fjson_object_iterator;
    pub fn fjson_object_iter_equal(
        a: *const fjson_object_iterator,
        b: *const fjson_object_iterator,
    ) -> c_int;
    pub fn fjson_object_iter_peek_name(it: *const fjson_object_iterator) -> *const c_char;
    pub fn fjson_object_iter_peek_value(it: *const fjson_object_iterator) -> *mut fjson_object;
    pub fn fjson_object_iter_next(it: *mut fjson_object_iterator);
}
