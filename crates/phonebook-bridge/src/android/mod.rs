// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Targets `aarch64-linux-android` and `armv7-linux-androideabi`. Each trait
// method calls the Android SDK through JNI into the ART runtime.
//
// ## Architecture notes
//
// The host `PhonebookModule` (a React Native `ReactContextBaseJavaModule`)
// calls `nativeInit` once; that registers the JavaVM and application context
// with `ndk_context` and keeps a global reference to the module so that the
// current foreground `Activity` can be looked up on demand.
//
// The picker is launched with `startActivityForResult`. The module forwards
// its `onActivityResult` to `nativeOnActivityResult` (see `exports`), which
// drives phase two of the pick.
//
// Contact-store cursors are opened and closed inside `with_cursor`, which
// closes the cursor on every exit path, including a pending Java exception.

#![cfg(target_os = "android")]

pub mod exports;

use std::sync::OnceLock;

use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::jsize;
use jni::{JNIEnv, JavaVM};
use tracing::{debug, warn};

use phonebook_core::error::{PhonebookError, Result};
use phonebook_core::labels::FieldGroup;

use crate::traits::*;

// ---------------------------------------------------------------------------
// Contacts provider constants
// ---------------------------------------------------------------------------

const READ_CONTACTS: &str = "android.permission.READ_CONTACTS";
const PERMISSION_GRANTED: i32 = 0;

const CONTACTS_URI: &str = "content://com.android.contacts/contacts";
const PHONES_URI: &str = "content://com.android.contacts/data/phones";
const EMAILS_URI: &str = "content://com.android.contacts/data/emails";
const POSTALS_URI: &str = "content://com.android.contacts/data/postals";
const DATA_URI: &str = "content://com.android.contacts/data";

const ORGANIZATION_MIME: &str = "vnd.android.cursor.item/organization";

const COL_ID: &str = "_id";
const COL_DISPLAY_NAME: &str = "display_name";
const COL_HAS_PHONE: &str = "has_phone_number";
const COL_CONTACT_ID: &str = "contact_id";
const COL_MIMETYPE: &str = "mimetype";
// CommonDataKinds columns are aliases of the generic dataN columns.
const COL_DATA1: &str = "data1";
const COL_TYPE: &str = "data2";
const COL_LABEL: &str = "data3";
const COL_ORG_TITLE: &str = "data4";
const COL_POSTAL_STREET: &str = "data4";
const COL_POSTAL_CITY: &str = "data7";
const COL_POSTAL_REGION: &str = "data8";
const COL_POSTAL_POSTCODE: &str = "data9";
const COL_POSTAL_COUNTRY: &str = "data10";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

/// The process JavaVM, taken from `ndk_context` on first use.
fn java_vm() -> Result<&'static JavaVM> {
    if let Some(vm) = JAVA_VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` is the `JavaVM*` registered in `nativeInit` (or by
    // the NDK glue). It is valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| PhonebookError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    Ok(JAVA_VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] for the current thread, attaching it if needed.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| PhonebookError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// The application `Context` registered with `ndk_context`.
fn app_context() -> Result<JObject<'static>> {
    let ptr = ndk_context::android_context().context();
    if ptr.is_null() {
        return Err(PhonebookError::Bridge(
            "Android context is null; nativeInit has not run".into(),
        ));
    }
    // SAFETY: the pointer is a global reference created in `nativeInit`
    // and never released.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

fn jni_err(context: &str, e: jni::errors::Error) -> PhonebookError {
    PhonebookError::Bridge(format!("{context}: {e}"))
}

fn store_err(context: &str, e: jni::errors::Error) -> PhonebookError {
    PhonebookError::Store(format!("{context}: {e}"))
}

/// Clear a pending Java exception and return its message.
fn take_exception_message(env: &mut JNIEnv<'_>) -> Option<String> {
    if !env.exception_check().unwrap_or(false) {
        return None;
    }
    let throwable = env.exception_occurred().ok()?;
    let _ = env.exception_clear();
    let message = env
        .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
        .ok()?
        .l()
        .ok()?;
    if message.is_null() {
        return None;
    }
    env.get_string(&JString::from(message)).ok().map(Into::into)
}

fn new_string_array<'local>(
    env: &mut JNIEnv<'local>,
    values: &[&str],
) -> Result<JObject<'local>> {
    let string_class = env
        .find_class("java/lang/String")
        .map_err(|e| jni_err("find_class(String)", e))?;
    let array = env
        .new_object_array(values.len() as jsize, &string_class, JObject::null())
        .map_err(|e| jni_err("new_object_array", e))?;
    for (i, value) in values.iter().enumerate() {
        let j_value = env
            .new_string(value)
            .map_err(|e| jni_err("new_string(array element)", e))?;
        env.set_object_array_element(&array, i as jsize, j_value)
            .map_err(|e| jni_err("set_object_array_element", e))?;
    }
    Ok(array.into())
}

// ---------------------------------------------------------------------------
// Cursor helpers
// ---------------------------------------------------------------------------

/// Run `read` against a cursor and close it afterwards, whatever `read`
/// returned. A null cursor yields `Ok(None)`.
fn with_cursor<'local, T>(
    env: &mut JNIEnv<'local>,
    cursor: JObject<'local>,
    read: impl FnOnce(&mut JNIEnv<'local>, &JObject<'local>) -> Result<T>,
) -> Result<Option<T>> {
    if cursor.is_null() {
        return Ok(None);
    }

    let result = read(env, &cursor);

    if let Some(message) = take_exception_message(env) {
        warn!(%message, "Java exception while reading cursor");
    }
    if let Err(e) = env.call_method(&cursor, "close", "()V", &[]) {
        let _ = take_exception_message(env);
        warn!(error = %e, "Cursor.close failed");
    }

    result.map(Some)
}

/// `ContentResolver.query(uri, projection, selection, args, null)`.
fn query<'local>(
    env: &mut JNIEnv<'local>,
    uri: &str,
    projection: Option<&[&str]>,
    selection: Option<&str>,
    args: &[&str],
) -> Result<JObject<'local>> {
    let context = app_context()?;

    let j_uri_str = env
        .new_string(uri)
        .map_err(|e| store_err("new_string(uri)", e))?;
    let uri_obj = env
        .call_static_method(
            "android/net/Uri",
            "parse",
            "(Ljava/lang/String;)Landroid/net/Uri;",
            &[JValue::Object(&j_uri_str)],
        )
        .map_err(|e| store_err("Uri.parse", e))?
        .l()
        .map_err(|e| store_err("Uri.parse->l", e))?;

    let resolver = env
        .call_method(
            &context,
            "getContentResolver",
            "()Landroid/content/ContentResolver;",
            &[],
        )
        .map_err(|e| store_err("getContentResolver", e))?
        .l()
        .map_err(|e| store_err("getContentResolver->l", e))?;

    let j_projection = match projection {
        Some(columns) => new_string_array(env, columns)?,
        None => JObject::null(),
    };
    let j_selection: JObject = match selection {
        Some(s) => env
            .new_string(s)
            .map_err(|e| store_err("new_string(selection)", e))?
            .into(),
        None => JObject::null(),
    };
    let j_args = if args.is_empty() {
        JObject::null()
    } else {
        new_string_array(env, args)?
    };

    let cursor = env
        .call_method(
            &resolver,
            "query",
            "(Landroid/net/Uri;[Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)Landroid/database/Cursor;",
            &[
                JValue::Object(&uri_obj),
                JValue::Object(&j_projection),
                JValue::Object(&j_selection),
                JValue::Object(&j_args),
                JValue::Object(&JObject::null()),
            ],
        )
        .map_err(|e| {
            let detail = take_exception_message(env).unwrap_or_else(|| e.to_string());
            PhonebookError::Store(format!("ContentResolver.query({uri}): {detail}"))
        })?
        .l()
        .map_err(|e| store_err("query->l", e))?;

    Ok(cursor)
}

fn move_to(env: &mut JNIEnv<'_>, cursor: &JObject<'_>, method: &str) -> Result<bool> {
    env.call_method(cursor, method, "()Z", &[])
        .map_err(|e| store_err(method, e))?
        .z()
        .map_err(|e| store_err(method, e))
}

fn column_index(env: &mut JNIEnv<'_>, cursor: &JObject<'_>, column: &str) -> Result<i32> {
    let j_column = env
        .new_string(column)
        .map_err(|e| store_err("new_string(column)", e))?;
    env.call_method(
        cursor,
        "getColumnIndexOrThrow",
        "(Ljava/lang/String;)I",
        &[JValue::Object(&j_column)],
    )
    .map_err(|e| store_err(&format!("getColumnIndexOrThrow({column})"), e))?
    .i()
    .map_err(|e| store_err("getColumnIndexOrThrow->i", e))
}

fn cursor_string(
    env: &mut JNIEnv<'_>,
    cursor: &JObject<'_>,
    column: &str,
) -> Result<Option<String>> {
    let index = column_index(env, cursor, column)?;
    let value = env
        .call_method(cursor, "getString", "(I)Ljava/lang/String;", &[JValue::Int(index)])
        .map_err(|e| store_err(&format!("getString({column})"), e))?
        .l()
        .map_err(|e| store_err("getString->l", e))?;
    if value.is_null() {
        return Ok(None);
    }
    let text: String = env
        .get_string(&JString::from(value))
        .map_err(|e| store_err("get_string", e))?
        .into();
    Ok(Some(text))
}

fn cursor_int(env: &mut JNIEnv<'_>, cursor: &JObject<'_>, column: &str) -> Result<i32> {
    let index = column_index(env, cursor, column)?;
    env.call_method(cursor, "getInt", "(I)I", &[JValue::Int(index)])
        .map_err(|e| store_err(&format!("getInt({column})"), e))?
        .i()
        .map_err(|e| store_err("getInt->i", e))
}

fn labelled_row(env: &mut JNIEnv<'_>, cursor: &JObject<'_>) -> Result<LabelledRow> {
    Ok(LabelledRow {
        value: cursor_string(env, cursor, COL_DATA1)?,
        kind: cursor_int(env, cursor, COL_TYPE)?,
        custom_label: cursor_string(env, cursor, COL_LABEL)?,
    })
}

/// Local references one row read may create (column names, strings).
const ROW_FRAME_CAPACITY: i32 = 32;

/// All rows of a per-contact field-group query. Each row is read in its own
/// local frame, so the references it creates are released before the next.
fn rows_for_contact<T>(
    uri: &str,
    contact_id: &str,
    mut read_row: impl FnMut(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut env = jni_env()?;
    let selection = format!("{COL_CONTACT_ID} = ?");
    let cursor = query(&mut env, uri, None, Some(&selection), &[contact_id])?;
    let rows = with_cursor(&mut env, cursor, |env, c| {
        let mut rows = Vec::new();
        while move_to(env, c, "moveToNext")? {
            let row = env
                .with_local_frame(ROW_FRAME_CAPACITY, |env| {
                    Ok::<_, jni::errors::Error>(read_row(env, c))
                })
                .map_err(|e| store_err("with_local_frame", e))??;
            rows.push(row);
        }
        Ok(rows)
    })?;
    Ok(rows.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Platform struct
// ---------------------------------------------------------------------------

/// Android implementation of the contacts platform.
///
/// Holds a global reference to the host `PhonebookModule`, used to find the
/// current foreground activity and to deliver results back to Java.
pub struct AndroidPlatform {
    module: GlobalRef,
    module_class: GlobalRef,
}

impl AndroidPlatform {
    pub fn new(module: GlobalRef, module_class: GlobalRef) -> Self {
        Self {
            module,
            module_class,
        }
    }

    /// The module class, for static callbacks into Java.
    pub fn module_class(&self) -> &GlobalRef {
        &self.module_class
    }

    fn current_activity<'local>(&self, env: &mut JNIEnv<'local>) -> Result<JObject<'local>> {
        env.call_method(
            self.module.as_obj(),
            "getCurrentActivity",
            "()Landroid/app/Activity;",
            &[],
        )
        .map_err(|e| jni_err("getCurrentActivity", e))?
        .l()
        .map_err(|e| jni_err("getCurrentActivity->l", e))
    }
}

impl ContactsPlatform for AndroidPlatform {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativePermissions — Context.checkSelfPermission / Activity.requestPermissions
// ---------------------------------------------------------------------------

impl NativePermissions for AndroidPlatform {
    fn has_read_contacts(&self) -> bool {
        let check = || -> Result<bool> {
            let mut env = jni_env()?;
            let context = app_context()?;
            let j_permission = env
                .new_string(READ_CONTACTS)
                .map_err(|e| jni_err("new_string(READ_CONTACTS)", e))?;
            let status = env
                .call_method(
                    &context,
                    "checkSelfPermission",
                    "(Ljava/lang/String;)I",
                    &[JValue::Object(&j_permission)],
                )
                .map_err(|e| jni_err("checkSelfPermission", e))?
                .i()
                .map_err(|e| jni_err("checkSelfPermission->i", e))?;
            Ok(status == PERMISSION_GRANTED)
        };
        check().unwrap_or_else(|e| {
            warn!(error = %e, "permission check failed; reporting not granted");
            false
        })
    }

    fn request_read_contacts(&self, request_code: i32) -> Result<()> {
        let mut env = jni_env()?;
        let activity = self.current_activity(&mut env)?;
        if activity.is_null() {
            return Err(PhonebookError::Bridge("no foreground activity".into()));
        }
        let permissions = new_string_array(&mut env, &[READ_CONTACTS])?;
        env.call_method(
            &activity,
            "requestPermissions",
            "([Ljava/lang/String;I)V",
            &[JValue::Object(&permissions), JValue::Int(request_code)],
        )
        .map_err(|e| jni_err("requestPermissions", e))?;
        debug!(request_code, "Android: permission dialog requested");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeContactPicker — Intent ACTION_PICK on Contacts.CONTENT_URI
// ---------------------------------------------------------------------------

impl NativeContactPicker for AndroidPlatform {
    fn has_foreground_activity(&self) -> bool {
        jni_env()
            .and_then(|mut env| self.current_activity(&mut env))
            .map(|activity| !activity.is_null())
            .unwrap_or_else(|e| {
                warn!(error = %e, "current activity lookup failed");
                false
            })
    }

    fn launch_picker(&self, request_code: i32) -> Result<()> {
        let mut env = jni_env()?;
        let activity = self.current_activity(&mut env)?;
        if activity.is_null() {
            return Err(PhonebookError::Bridge("no foreground activity".into()));
        }

        let j_action = env
            .new_string("android.intent.action.PICK")
            .map_err(|e| jni_err("new_string(ACTION_PICK)", e))?;
        let j_uri_str = env
            .new_string(CONTACTS_URI)
            .map_err(|e| jni_err("new_string(CONTENT_URI)", e))?;
        let uri = env
            .call_static_method(
                "android/net/Uri",
                "parse",
                "(Ljava/lang/String;)Landroid/net/Uri;",
                &[JValue::Object(&j_uri_str)],
            )
            .map_err(|e| jni_err("Uri.parse", e))?
            .l()
            .map_err(|e| jni_err("Uri.parse->l", e))?;

        let intent = env
            .new_object(
                "android/content/Intent",
                "(Ljava/lang/String;Landroid/net/Uri;)V",
                &[JValue::Object(&j_action), JValue::Object(&uri)],
            )
            .map_err(|e| jni_err("new Intent(ACTION_PICK)", e))?;

        // startActivityForResult throws ActivityNotFoundException when no
        // app handles the intent; report the Java message as-is.
        if let Err(e) = env.call_method(
            &activity,
            "startActivityForResult",
            "(Landroid/content/Intent;I)V",
            &[JValue::Object(&intent), JValue::Int(request_code)],
        ) {
            let detail = take_exception_message(&mut env).unwrap_or_else(|| e.to_string());
            return Err(PhonebookError::Bridge(detail));
        }

        tracing::info!(request_code, "Android: picker intent dispatched, awaiting onActivityResult");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeContactStore — ContentResolver queries
// ---------------------------------------------------------------------------

impl NativeContactStore for AndroidPlatform {
    fn core_record(&self, selection_uri: &str) -> Result<Option<CoreRow>> {
        let mut env = jni_env()?;
        let cursor = query(
            &mut env,
            selection_uri,
            Some(&[COL_ID, COL_DISPLAY_NAME, COL_HAS_PHONE][..]),
            None,
            &[],
        )?;
        let row = with_cursor(&mut env, cursor, |env, c| {
            if !move_to(env, c, "moveToFirst")? {
                return Ok(None);
            }
            let id = cursor_string(env, c, COL_ID)?
                .ok_or_else(|| PhonebookError::Store("contact row has no _id".into()))?;
            Ok(Some(CoreRow {
                id,
                display_name: cursor_string(env, c, COL_DISPLAY_NAME)?,
                has_phone_number: cursor_int(env, c, COL_HAS_PHONE)? > 0,
            }))
        })?;
        Ok(row.flatten())
    }

    fn phone_rows(&self, contact_id: &str) -> Result<Vec<LabelledRow>> {
        rows_for_contact(PHONES_URI, contact_id, |env, c| labelled_row(env, c))
    }

    fn email_rows(&self, contact_id: &str) -> Result<Vec<LabelledRow>> {
        rows_for_contact(EMAILS_URI, contact_id, |env, c| labelled_row(env, c))
    }

    fn organization_row(&self, contact_id: &str) -> Result<Option<OrganizationRow>> {
        let mut env = jni_env()?;
        let selection = format!("{COL_CONTACT_ID} = ? AND {COL_MIMETYPE} = ?");
        let cursor = query(
            &mut env,
            DATA_URI,
            None,
            Some(&selection),
            &[contact_id, ORGANIZATION_MIME],
        )?;
        let row = with_cursor(&mut env, cursor, |env, c| {
            if !move_to(env, c, "moveToFirst")? {
                return Ok(None);
            }
            Ok(Some(OrganizationRow {
                company: cursor_string(env, c, COL_DATA1)?,
                title: cursor_string(env, c, COL_ORG_TITLE)?,
            }))
        })?;
        Ok(row.flatten())
    }

    fn postal_rows(&self, contact_id: &str) -> Result<Vec<PostalRow>> {
        rows_for_contact(POSTALS_URI, contact_id, |env, c| {
            Ok(PostalRow {
                kind: cursor_int(env, c, COL_TYPE)?,
                custom_label: cursor_string(env, c, COL_LABEL)?,
                street: cursor_string(env, c, COL_POSTAL_STREET)?,
                city: cursor_string(env, c, COL_POSTAL_CITY)?,
                region: cursor_string(env, c, COL_POSTAL_REGION)?,
                postcode: cursor_string(env, c, COL_POSTAL_POSTCODE)?,
                country: cursor_string(env, c, COL_POSTAL_COUNTRY)?,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// NativeTypeLabels — CommonDataKinds.*.getTypeLabel (localised)
// ---------------------------------------------------------------------------

impl NativeTypeLabels for AndroidPlatform {
    fn type_label(&self, group: FieldGroup, kind: i32, custom_label: Option<&str>) -> String {
        localized_type_label(group, kind, custom_label).unwrap_or_else(|e| {
            debug!(error = %e, ?group, kind, "falling back to built-in label");
            phonebook_core::labels::type_label(group, kind, custom_label)
        })
    }
}

fn localized_type_label(group: FieldGroup, kind: i32, custom_label: Option<&str>) -> Result<String> {
    let class = match group {
        FieldGroup::Phone => "android/provider/ContactsContract$CommonDataKinds$Phone",
        FieldGroup::Email => "android/provider/ContactsContract$CommonDataKinds$Email",
        FieldGroup::Postal => "android/provider/ContactsContract$CommonDataKinds$StructuredPostal",
    };

    let mut env = jni_env()?;
    let context = app_context()?;
    let resources = env
        .call_method(&context, "getResources", "()Landroid/content/res/Resources;", &[])
        .map_err(|e| jni_err("getResources", e))?
        .l()
        .map_err(|e| jni_err("getResources->l", e))?;

    let j_label: JObject = match custom_label {
        Some(label) => env
            .new_string(label)
            .map_err(|e| jni_err("new_string(label)", e))?
            .into(),
        None => JObject::null(),
    };

    let label = env
        .call_static_method(
            class,
            "getTypeLabel",
            "(Landroid/content/res/Resources;ILjava/lang/CharSequence;)Ljava/lang/CharSequence;",
            &[
                JValue::Object(&resources),
                JValue::Int(kind),
                JValue::Object(&j_label),
            ],
        )
        .map_err(|e| {
            let _ = take_exception_message(&mut env);
            jni_err("getTypeLabel", e)
        })?
        .l()
        .map_err(|e| jni_err("getTypeLabel->l", e))?;

    if label.is_null() {
        return Ok(String::new());
    }
    let text = env
        .call_method(&label, "toString", "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err("CharSequence.toString", e))?
        .l()
        .map_err(|e| jni_err("toString->l", e))?;
    Ok(env
        .get_string(&JString::from(text))
        .map_err(|e| jni_err("get_string(label)", e))?
        .into())
}

/// Hand a serialised envelope back to `PhonebookModule.deliverResult`.
pub fn deliver_to_java(module_class: &GlobalRef, token: i64, json: &str) -> Result<()> {
    let mut env = jni_env()?;
    let j_json = env
        .new_string(json)
        .map_err(|e| jni_err("new_string(envelope)", e))?;
    let class: &JClass = module_class.as_obj().into();
    env.call_static_method(
        class,
        "deliverResult",
        "(JLjava/lang/String;)V",
        &[JValue::Long(token), JValue::Object(&j_json)],
    )
    .map_err(|e| {
        let _ = take_exception_message(&mut env);
        jni_err("PhonebookModule.deliverResult", e)
    })?;
    Ok(())
}
