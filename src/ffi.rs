//! FFI bindings for Sleep Triage
//!
//! This module provides C-compatible functions for calling the classifier from
//! other languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `triage_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::input;
use crate::pipeline::{classify_json, SleepClassifier};
use crate::tree::DecisionTree;
use crate::types::FeatureSet;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Classify a JSON feature request and return the assessment JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `triage_free_string`.
/// - Returns NULL on error; call `triage_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn triage_classify(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match classify_json(json_str) {
        Ok(assessment) => string_to_cstr(&assessment),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Predict the label for four raw feature values.
///
/// # Safety
/// - Returns a newly allocated label string ("Insomnia", "Sleep Apnea" or
///   "None") that must be freed with `triage_free_string`.
/// - Returns NULL on error; call `triage_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn triage_predict(
    sleep_duration: f64,
    heart_rate: f64,
    daily_steps: f64,
    bmi: f64,
) -> *mut c_char {
    clear_last_error();

    let features = FeatureSet::from_values(sleep_duration, heart_rate, daily_steps, bmi);
    let label = input::validate(&features)
        .and_then(|()| DecisionTree::new().predict(&features));

    match label {
        Ok(label) => string_to_cstr(label.as_str()),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Classifier API
// ============================================================================

/// Opaque handle to a SleepClassifier
pub struct SleepClassifierHandle {
    classifier: SleepClassifier,
}

/// Create a new SleepClassifier.
///
/// # Safety
/// - Returns a pointer to a newly allocated SleepClassifier.
/// - Must be freed with `triage_classifier_free`.
#[no_mangle]
pub unsafe extern "C" fn triage_classifier_new() -> *mut SleepClassifierHandle {
    clear_last_error();

    let handle = Box::new(SleepClassifierHandle {
        classifier: SleepClassifier::new(),
    });
    Box::into_raw(handle)
}

/// Free a SleepClassifier.
///
/// # Safety
/// - `classifier` must be a valid pointer returned by `triage_classifier_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn triage_classifier_free(classifier: *mut SleepClassifierHandle) {
    if !classifier.is_null() {
        drop(Box::from_raw(classifier));
    }
}

/// Classify a JSON feature request with a classifier handle.
///
/// # Safety
/// - `classifier` must be a valid pointer returned by `triage_classifier_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `triage_free_string`.
/// - Returns NULL on error; call `triage_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn triage_classifier_assess(
    classifier: *const SleepClassifierHandle,
    json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if classifier.is_null() {
        set_last_error("Null classifier pointer");
        return ptr::null_mut();
    }

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let handle = &*classifier;
    match handle.classifier.assess_json(&json_str) {
        Ok(assessment) => string_to_cstr(&assessment),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a string returned by Sleep Triage functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Sleep Triage function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn triage_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Sleep Triage call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn triage_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn triage_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_request() -> CString {
        CString::new(r#"{"sleep_duration": 6.0, "heart_rate": 80, "daily_steps": 4000, "bmi": 22}"#)
            .unwrap()
    }

    #[test]
    fn test_ffi_classify() {
        let json = sample_request();

        unsafe {
            let result = triage_classify(json.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains(r#""label":"Insomnia""#));

            triage_free_string(result);
        }
    }

    #[test]
    fn test_ffi_predict() {
        unsafe {
            let result = triage_predict(8.0, 70.0, 6000.0, 24.0);
            assert!(!result.is_null());
            assert_eq!(CStr::from_ptr(result).to_str().unwrap(), "Sleep Apnea");
            triage_free_string(result);
        }
    }

    #[test]
    fn test_ffi_predict_threshold_boundary() {
        unsafe {
            let result = triage_predict(7.3, 76.0, 0.0, 0.0);
            assert!(!result.is_null());
            assert_eq!(CStr::from_ptr(result).to_str().unwrap(), "Sleep Apnea");
            triage_free_string(result);
        }
    }

    #[test]
    fn test_ffi_predict_rejects_negative() {
        unsafe {
            let result = triage_predict(8.0, -1.0, 6000.0, 24.0);
            assert!(result.is_null());

            let error = triage_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("heart_rate"));
        }
    }

    #[test]
    fn test_ffi_classifier_lifecycle() {
        unsafe {
            let classifier = triage_classifier_new();
            assert!(!classifier.is_null());

            let json = sample_request();
            let result = triage_classifier_assess(classifier, json.as_ptr());
            assert!(!result.is_null());
            triage_free_string(result);

            triage_classifier_free(classifier);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let missing = CString::new(r#"{"sleep_duration": 9.0, "daily_steps": 6000}"#).unwrap();
            let result = triage_classify(missing.as_ptr());
            assert!(result.is_null());

            let error = triage_last_error();
            assert!(!error.is_null());

            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("Missing required feature: bmi"));
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = triage_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
