// ==========================================
// 配置层集成测试
// ==========================================

mod test_helpers;

use listing_import::config::{config_keys, ConfigManager, ImportConfig};
use listing_import::logging;
use test_helpers::create_test_db;

#[tokio::test]
async fn test_load_defaults_from_empty_store() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    let config = ImportConfig::load(&manager).await.unwrap();

    assert_eq!(config, ImportConfig::default());
}

#[tokio::test]
async fn test_load_overrides_from_config_kv() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();
    manager
        .set_global_config_value(config_keys::ADDRESS_DIRECTORY_URL, "http://127.0.0.1:8080/de/Streets")
        .unwrap();
    manager.set_global_config_value(config_keys::CSV_DELIMITER, ",").unwrap();
    manager.set_global_config_value(config_keys::HTTP_TIMEOUT_SECS, "10").unwrap();
    manager.set_global_config_value(config_keys::USER_AGENT, "qa-run/1").unwrap();

    // 新连接读取同一数据库
    let reader = ConfigManager::new(&db_path).unwrap();
    let config = ImportConfig::load(&reader).await.unwrap();

    assert_eq!(config.address_directory_url, "http://127.0.0.1:8080/de/Streets");
    assert_eq!(config.csv_delimiter, b',');
    assert_eq!(config.http_timeout_secs, Some(10));
    assert_eq!(config.user_agent, "qa-run/1");
}
