pub const PLAB_CLI: &str = "plab";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_WILDCARDS_DIR: &str = "wildcards";
