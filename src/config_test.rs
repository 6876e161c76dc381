use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: u16 = env_parse("__PIPELINE_TEST_MISSING_KEY__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__PIPELINE_TEST_EP_VALID__", "8080") };
    let val: u16 = env_parse("__PIPELINE_TEST_EP_VALID__", 0);
    assert_eq!(val, 8080);
    unsafe { std::env::remove_var("__PIPELINE_TEST_EP_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__PIPELINE_TEST_EP_INVALID__", "ninety") };
    let val: u32 = env_parse("__PIPELINE_TEST_EP_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__PIPELINE_TEST_EP_INVALID__") };
}

// =============================================================================
// BOARD_SORT
// =============================================================================

#[test]
fn board_sort_accepts_both_spellings() {
    assert_eq!(board_sort_from(Some("input")), SortPolicy::InputOrder);
    assert_eq!(board_sort_from(Some("score_then_recency")), SortPolicy::ScoreThenRecency);
    assert_eq!(board_sort_from(Some(" score ")), SortPolicy::ScoreThenRecency);
}

#[test]
fn board_sort_unknown_or_missing_uses_default() {
    assert_eq!(board_sort_from(None), DEFAULT_BOARD_SORT);
    assert_eq!(board_sort_from(Some("alphabetical")), DEFAULT_BOARD_SORT);
}

// =============================================================================
// AppConfig
// =============================================================================

#[test]
fn app_config_reads_environment_then_falls_back_to_defaults() {
    unsafe {
        std::env::set_var("PORT", "4100");
        std::env::set_var("DATABASE_URL", "postgres://localhost/pipeline");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
        std::env::set_var("BOARD_SORT", "input");
    }
    let config = AppConfig::from_env();
    assert_eq!(config.port, 4100);
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/pipeline"));
    assert_eq!(config.db_max_connections, 12);
    assert_eq!(config.board_sort, SortPolicy::InputOrder);

    unsafe {
        std::env::remove_var("PORT");
        std::env::set_var("DATABASE_URL", "   ");
        std::env::remove_var("DB_MAX_CONNECTIONS");
        std::env::remove_var("BOARD_SORT");
    }
    let config = AppConfig::from_env();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.database_url, None);
    assert_eq!(config.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(config.board_sort, DEFAULT_BOARD_SORT);

    unsafe { std::env::remove_var("DATABASE_URL") };
}
