use uuid::Uuid;

const SUFFIX_LEN: usize = 8;

/// `prefix` followed by eight random lowercase hex characters, so repeated
/// runs do not collide on globally unique names.
pub fn random_name(prefix: &str) -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(SUFFIX_LEN);
    format!("{prefix}{suffix}")
}
