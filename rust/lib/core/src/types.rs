/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Shallow merge of a JSON patch into a base object.
///
/// Every key in `patch` replaces the whole value under that key in `base`;
/// nested objects are not merged. A `null` patch value removes the key.
/// A non-object patch or base leaves `base` untouched.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) else {
        return;
    };
    for (key, value) in patch_obj {
        if value.is_null() {
            base_obj.remove(key);
        } else {
            base_obj.insert(key.clone(), value.clone());
        }
    }
}
