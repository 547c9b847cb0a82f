// Names and limits shared by the codec, the store and the session

/// Name of the synthetic section holding lines before the first header
pub const GLOBAL_SECTION: &str = "Global";

/// Section preferred for newly created proxy groups (matched case-insensitively)
pub const CUSTOM_SECTION: &str = "custom";

pub const RULESET_KEY: &str = "ruleset";
pub const PROXY_GROUP_KEY: &str = "custom_proxy_group";

/// Separator between fields of a `custom_proxy_group=` value
pub const GROUP_FIELD_SEPARATOR: char = '`';

/// Prefix marking a group reference or special target in a member list
pub const GROUP_REF_PREFIX: &str = "[]";

/// Maximum number of undo snapshots kept
pub const HISTORY_LIMIT: usize = 50;

/// Draft cache key prefix, followed by the document name
pub const DRAFT_KEY_PREFIX: &str = "ini-editor-draft-";

/// Draft cache key remembering the last opened document
pub const LAST_FILE_KEY: &str = "ini-editor-current-file";
