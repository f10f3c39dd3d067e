//! Declarations for the subset of the libopenmpt C API the backend uses.
//!
//! Matches `libopenmpt.h` from libopenmpt 0.3 and later.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_double, c_int, c_void};

#[repr(C)]
pub struct openmpt_module {
    _private: [u8; 0],
}

#[repr(C)]
pub struct openmpt_module_initial_ctl {
    pub ctl: *const c_char,
    pub value: *const c_char,
}

pub type openmpt_log_func = Option<unsafe extern "C" fn(message: *const c_char, user: *mut c_void)>;
pub type openmpt_error_func = Option<unsafe extern "C" fn(error: c_int, user: *mut c_void) -> c_int>;

pub const OPENMPT_PROBE_FILE_HEADER_FLAGS_DEFAULT: u64 = 0x1 | 0x2;

pub const OPENMPT_PROBE_FILE_HEADER_RESULT_SUCCESS: c_int = 1;
pub const OPENMPT_PROBE_FILE_HEADER_RESULT_FAILURE: c_int = 0;
pub const OPENMPT_PROBE_FILE_HEADER_RESULT_WANTMOREDATA: c_int = -1;

pub const OPENMPT_MODULE_RENDER_STEREOSEPARATION_PERCENT: c_int = 2;
pub const OPENMPT_MODULE_RENDER_INTERPOLATIONFILTER_LENGTH: c_int = 3;

#[link(name = "openmpt")]
extern "C" {
    pub fn openmpt_get_library_version() -> u32;

    pub fn openmpt_free_string(str: *const c_char);

    pub fn openmpt_log_func_silent(message: *const c_char, user: *mut c_void);
    pub fn openmpt_error_func_ignore(error: c_int, user: *mut c_void) -> c_int;

    pub fn openmpt_probe_file_header_get_recommended_size() -> usize;
    pub fn openmpt_probe_file_header(
        flags: u64,
        data: *const c_void,
        size: usize,
        filesize: u64,
        logfunc: openmpt_log_func,
        loguser: *mut c_void,
        errfunc: openmpt_error_func,
        erruser: *mut c_void,
        error: *mut c_int,
        error_message: *mut *const c_char,
    ) -> c_int;

    pub fn openmpt_module_create_from_memory2(
        filedata: *const c_void,
        filesize: usize,
        logfunc: openmpt_log_func,
        loguser: *mut c_void,
        errfunc: openmpt_error_func,
        erruser: *mut c_void,
        error: *mut c_int,
        error_message: *mut *const c_char,
        ctls: *const openmpt_module_initial_ctl,
    ) -> *mut openmpt_module;
    pub fn openmpt_module_destroy(module: *mut openmpt_module);

    pub fn openmpt_module_set_repeat_count(module: *mut openmpt_module, repeat_count: i32) -> c_int;
    pub fn openmpt_module_set_render_param(
        module: *mut openmpt_module,
        param: c_int,
        value: i32,
    ) -> c_int;

    pub fn openmpt_module_get_duration_seconds(module: *mut openmpt_module) -> c_double;
    pub fn openmpt_module_set_position_seconds(
        module: *mut openmpt_module,
        seconds: c_double,
    ) -> c_double;

    pub fn openmpt_module_read_interleaved_stereo(
        module: *mut openmpt_module,
        samplerate: i32,
        count: usize,
        interleaved_stereo: *mut i16,
    ) -> usize;

    pub fn openmpt_module_get_metadata(
        module: *mut openmpt_module,
        key: *const c_char,
    ) -> *const c_char;

    pub fn openmpt_module_get_num_subsongs(module: *mut openmpt_module) -> i32;
    pub fn openmpt_module_get_num_channels(module: *mut openmpt_module) -> i32;
    pub fn openmpt_module_get_num_orders(module: *mut openmpt_module) -> i32;
    pub fn openmpt_module_get_num_patterns(module: *mut openmpt_module) -> i32;
    pub fn openmpt_module_get_num_instruments(module: *mut openmpt_module) -> i32;
    pub fn openmpt_module_get_num_samples(module: *mut openmpt_module) -> i32;

    pub fn openmpt_module_get_instrument_name(
        module: *mut openmpt_module,
        index: i32,
    ) -> *const c_char;
    pub fn openmpt_module_get_sample_name(module: *mut openmpt_module, index: i32)
        -> *const c_char;
}
