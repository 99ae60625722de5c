// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI entry points for `com.reactnativephonebook.PhonebookModule`.
//
// The Java module declares these as `native` methods and forwards its React
// methods and `onActivityResult` here. Envelopes go back as JSON through the
// static `PhonebookModule.deliverResult(long token, String json)`; the token
// identifies the Promise or Callback the module is holding for the call.

use std::sync::Once;

use jni::JNIEnv;
use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jint, jlong};
use tracing::{error, info, warn};

use phonebook_core::PickerConfig;
use phonebook_core::error::{PhonebookError, Result};
use phonebook_core::messages;
use phonebook_core::types::{Envelope, PickerOptions};

use super::{AndroidPlatform, deliver_to_java};
use crate::picker::{ContactPicker, PickerOutcome};
use crate::registry::PickerRegistry;

/// Picker bound to the most recently constructed module instance.
static PICKER: PickerRegistry<AndroidPlatform> = PickerRegistry::new();

/// `ndk_context` accepts exactly one registration per process.
static NDK_CONTEXT: Once = Once::new();

fn to_jboolean(value: bool) -> jboolean {
    if value { JNI_TRUE } else { JNI_FALSE }
}

fn read_optional_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    let text: String = env
        .get_string(value)
        .map_err(|e| PhonebookError::Bridge(format!("get_string: {e}")))?
        .into();
    Ok(Some(text))
}

fn deliver(module_class: &GlobalRef, token: i64, envelope: &Envelope) {
    let json = match envelope.to_json() {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, token, "failed to serialise envelope");
            return;
        }
    };
    if let Err(e) = deliver_to_java(module_class, token, &json) {
        error!(error = %e, token, "failed to deliver envelope to Java");
    }
}

/// Used only before `nativeInit` has succeeded, when no global class
/// reference exists yet.
fn deliver_uninitialised(env: &mut JNIEnv<'_>, this: &JObject<'_>, token: i64) {
    let envelope = Envelope::failure(messages::NO_ACTIVITY);
    let Ok(json) = envelope.to_json() else {
        return;
    };
    let result = env.new_string(json).and_then(|j_json| {
        let class = env.get_object_class(this)?;
        env.call_static_method(
            &class,
            "deliverResult",
            "(JLjava/lang/String;)V",
            &[JValue::Long(token), JValue::Object(&j_json)],
        )
    });
    if let Err(e) = result {
        error!(error = %e, token, "failed to deliver envelope to Java");
    }
}

fn bridge(context: &'static str) -> impl Fn(jni::errors::Error) -> PhonebookError {
    move |e| PhonebookError::Bridge(format!("{context}: {e}"))
}

fn init(
    env: &mut JNIEnv<'_>,
    this: &JObject<'_>,
    config: &JString<'_>,
) -> Result<ContactPicker<AndroidPlatform>> {
    let config_json = read_optional_string(env, config)?.unwrap_or_default();
    let config = PickerConfig::from_json(&config_json)?;

    let module = env
        .new_global_ref(this)
        .map_err(bridge("new_global_ref(module)"))?;
    let class = env
        .get_object_class(this)
        .map_err(bridge("get_object_class"))?;
    let module_class = env
        .new_global_ref(&class)
        .map_err(bridge("new_global_ref(class)"))?;

    if !NDK_CONTEXT.is_completed() {
        register_ndk_context(env, this)?;
    }

    Ok(ContactPicker::new(AndroidPlatform::new(module, module_class), config))
}

/// Register the JavaVM and application context with `ndk_context`, once.
fn register_ndk_context(env: &mut JNIEnv<'_>, this: &JObject<'_>) -> Result<()> {
    let vm = env.get_java_vm().map_err(bridge("get_java_vm"))?;
    let app_context = env
        .call_method(
            this,
            "getReactApplicationContext",
            "()Lcom/facebook/react/bridge/ReactApplicationContext;",
            &[],
        )
        .map_err(bridge("getReactApplicationContext"))?
        .l()
        .map_err(bridge("getReactApplicationContext->l"))?;
    let context_ref = env
        .new_global_ref(&app_context)
        .map_err(bridge("new_global_ref(context)"))?;

    NDK_CONTEXT.call_once(move || {
        // SAFETY: both pointers stay valid for the life of the process; the
        // context global reference is never released.
        unsafe {
            ndk_context::initialize_android_context(
                vm.get_java_vm_pointer().cast(),
                context_ref.as_obj().as_raw().cast(),
            );
        }
        std::mem::forget(context_ref);
    });
    Ok(())
}

/// `boolean nativeInit(String configJson)`. Called from the module
/// constructor on the UI thread, again for every module instance created
/// after a reload.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeInit<'local>(
    mut env: JNIEnv<'local>,
    this: JObject<'local>,
    config: JString<'local>,
) -> jboolean {
    crate::init_logging();
    match init(&mut env, &this, &config) {
        Ok(picker) => {
            if PICKER.install(picker).is_some() {
                info!("phonebook bridge re-initialised for a new module instance");
            } else {
                info!("phonebook bridge initialised");
            }
            JNI_TRUE
        }
        Err(e) => {
            error!(error = %e, "phonebook bridge initialisation failed");
            JNI_FALSE
        }
    }
}

/// `boolean nativeIsPhonebookAvailable()`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeIsPhonebookAvailable<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jboolean {
    JNI_TRUE
}

/// `boolean nativeHasContactsPermission()`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeHasContactsPermission<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jboolean {
    to_jboolean(PICKER.current().is_some_and(|p| p.has_permission()))
}

/// `boolean nativeRequestContactsPermission()`. The result is the grant
/// state read right after the dialog was issued.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeRequestContactsPermission<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jboolean {
    to_jboolean(
        PICKER
            .current()
            .is_some_and(|p| p.request_permission().granted()),
    )
}

/// `boolean nativeOnPermissionResult(int requestCode, boolean granted)`.
/// Returns the settled grant state, or `false` for a foreign request code.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeOnPermissionResult<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    request_code: jint,
    granted: jboolean,
) -> jboolean {
    let settled = PICKER
        .current()
        .and_then(|p| p.handle_permission_result(request_code, granted == JNI_TRUE));
    to_jboolean(settled.unwrap_or(false))
}

/// `void nativeOpenPhonebook(String optionsJson, long token)`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeOpenPhonebook<'local>(
    mut env: JNIEnv<'local>,
    this: JObject<'local>,
    options: JString<'local>,
    token: jlong,
) {
    let Some(picker) = PICKER.current() else {
        error!("nativeOpenPhonebook before nativeInit");
        deliver_uninitialised(&mut env, &this, token);
        return;
    };

    let options = read_optional_string(&mut env, &options)
        .and_then(|json| PickerOptions::from_json(json.as_deref().unwrap_or_default()))
        .unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable picker options");
            PickerOptions::default()
        });

    let module_class = picker.platform().module_class().clone();
    picker.open_picker_with_callback(&options, move |envelope| {
        deliver(&module_class, token, &envelope)
    });
}

/// `boolean nativeOnActivityResult(int requestCode, int resultCode, String dataUri)`.
/// Returns `false` when the result belongs to another request.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeOnActivityResult<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    request_code: jint,
    result_code: jint,
    data_uri: JString<'local>,
) -> jboolean {
    let Some(picker) = PICKER.current() else {
        return JNI_FALSE;
    };
    let data_uri = read_optional_string(&mut env, &data_uri).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable selection URI");
        None
    });
    let outcome = PickerOutcome::from_result_code(result_code, data_uri);
    to_jboolean(picker.handle_activity_result(request_code, outcome))
}

/// `boolean nativeOnHostDestroy()`. The host activity is going away, so an
/// open picker's result will not be forwarded; its request fails with the
/// selection-failed envelope. Returns whether a request was outstanding.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_reactnativephonebook_PhonebookModule_nativeOnHostDestroy<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jboolean {
    to_jboolean(PICKER.interrupt())
}
