use anyhow::Result;
use order_etl::config::toml_config::TomlConfig;
use order_etl::{CliConfig, EtlEngine, LocalStorage, ManifestPipeline, PageKind};
use tempfile::TempDir;

const ORDER_PAGE_1: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="a-row">
    <span data-test-id="order-id-value">114-1111111-0000001</span>
  </div>
  <div data-test-id="shipping-section-buyer-address">
    <span>张三</span>
    <span>上海市徐汇区XX路100号</span>
    <span>上海</span>
    <span>200030</span>
    <span>China</span>
  </div>
  <span data-test-id="shipping-section-phone">+86 21 5555 0000</span>
</body></html>"#;

const ORDER_PAGE_2: &str = r#"<!DOCTYPE html>
<html><body>
  <span data-test-id="order-id-value">114-2222222-0000002</span>
  <div data-test-id="shipping-section-buyer-address">
    <span>Jane Doe</span>
    <span>1-2-3 Shibuya区</span>
    <span>Apt 4</span>
    <span><span>Tokyo</span><span>東京都</span></span>
    <span>150-0002</span>
    <span>Japan</span>
  </div>
</body></html>"#;

const LIST_PAGE: &str = r#"<!DOCTYPE html>
<html><body><table>
  <tr><td><div data-test-id="shipping-section-buyer-address">
    <span>张三</span><span>上海市徐汇区XX路100号</span><span>200030</span>
  </div></td></tr>
  <tr><td><div data-test-id="shipping-section-buyer-address">
    <span>Jane Doe</span><span><span>Tokyo</span> <span>東京都</span></span>
  </div></td></tr>
</table></body></html>"#;

fn cli_config(inputs: Vec<String>, output_path: &str) -> CliConfig {
    CliConfig {
        inputs,
        output_path: output_path.to_string(),
        page_kind: PageKind::Detail,
        formats: vec!["csv".to_string(), "json".to_string()],
        zip: false,
        archive_name: "orders.zip".to_string(),
        fail_fast: false,
        defaults: vec![],
        address_sheet: None,
        verbose: false,
        json_logs: false,
    }
}

#[tokio::test]
async fn test_detail_pages_to_manifest() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let pages_dir = temp_dir.path().join("pages");
    std::fs::create_dir_all(&pages_dir)?;
    std::fs::write(pages_dir.join("order-1.html"), ORDER_PAGE_1)?;
    std::fs::write(pages_dir.join("order-2.html"), ORDER_PAGE_2)?;
    std::fs::write(pages_dir.join("broken.html"), "   ")?;

    let output_dir = temp_dir.path().join("out");
    let mut config = cli_config(
        vec![pages_dir.to_string_lossy().into_owned()],
        &output_dir.to_string_lossy(),
    );
    config
        .defaults
        .push(("英文品名1".to_string(), "ballet-dress".to_string()));

    let pipeline = ManifestPipeline::new(LocalStorage::default(), config)?;
    let engine = EtlEngine::new(pipeline);
    engine.run().await?;

    let csv_content = std::fs::read_to_string(output_dir.join("manifest.csv"))?;
    let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
    let headers = reader.headers()?.clone();
    assert_eq!(headers.len(), 31);
    assert_eq!(&headers[0], "订单号");

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 2);

    // broken.html 排序在前但被略過，order-1 為第一列
    assert_eq!(&rows[0][0], "114-1111111-0000001");
    assert_eq!(&rows[0][4], "张三");
    assert_eq!(&rows[0][5], "+86 21 5555 0000");
    assert_eq!(&rows[0][9], "China");
    assert_eq!(&rows[0][10], "上海");
    assert_eq!(&rows[0][11], "上海市");
    assert_eq!(&rows[0][12], "200030");
    assert_eq!(&rows[0][13], "上海市徐汇区XX路100号");
    assert_eq!(&rows[0][27], "ballet-dress");

    assert_eq!(&rows[1][5], "");
    assert_eq!(&rows[1][10], "Tokyo");
    assert_eq!(&rows[1][11], "Shibuya区");
    assert_eq!(&rows[1][13], "1-2-3 Shibuya区 Apt 4");

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output_dir.join("manifest.json"))?)?;
    assert_eq!(json["records"].as_array().map(Vec::len), Some(2));
    let skipped = json["skipped_pages"][0].as_str().unwrap_or_default();
    assert!(skipped.ends_with("broken.html"));

    Ok(())
}

#[tokio::test]
async fn test_fail_fast_stops_on_blank_page() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let blank = temp_dir.path().join("blank.html");
    std::fs::write(&blank, "")?;

    let output_dir = temp_dir.path().join("out");
    let mut config = cli_config(
        vec![blank.to_string_lossy().into_owned()],
        &output_dir.to_string_lossy(),
    );
    config.fail_fast = true;

    let engine = EtlEngine::new(ManifestPipeline::new(LocalStorage::default(), config)?);
    let result = engine.run().await;

    assert!(matches!(
        result,
        Err(order_etl::EtlError::MarkupError { .. })
    ));
    assert!(!output_dir.join("manifest.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_fail_fast_rejects_gbk_encoded_page() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page_path = temp_dir.path().join("gbk.html");
    let mut page = ORDER_PAGE_1.replace("张三", "@NAME@").into_bytes();
    let at = page
        .windows(6)
        .position(|w| w == b"@NAME@")
        .ok_or_else(|| anyhow::anyhow!("name placeholder missing"))?;
    // GBK 編碼的「张三」
    page.splice(at..at + 6, [0xD5, 0xC5, 0xC8, 0xFD]).for_each(drop);
    std::fs::write(&page_path, page)?;

    let output_dir = temp_dir.path().join("out");
    let mut config = cli_config(
        vec![page_path.to_string_lossy().into_owned()],
        &output_dir.to_string_lossy(),
    );
    config.fail_fast = true;

    let engine = EtlEngine::new(ManifestPipeline::new(LocalStorage::default(), config)?);
    let result = engine.run().await;

    assert!(matches!(
        result,
        Err(order_etl::EtlError::MarkupError { .. })
    ));
    assert!(!output_dir.join("manifest.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_list_page_from_toml_config_fills_sheet() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_string_lossy().replace('\\', "/");

    std::fs::write(temp_dir.path().join("orders.html"), LIST_PAGE)?;
    std::fs::write(
        temp_dir.path().join("sheet.csv"),
        "订单号,备注\n114-1,\n114-2,gift\n",
    )?;

    let config_content = format!(
        r#"
[pipeline]
name = "list-test"

[source]
inputs = ["{path}/orders.html"]
page_kind = "list"

[load]
output_path = "{path}/out"
output_formats = ["csv", "tsv"]
address_sheet = "{path}/sheet.csv"

[load.compression]
enabled = true
filename = "addresses.zip"
"#,
        path = temp_path
    );
    let config = TomlConfig::from_toml_str(&config_content)?;

    let engine = EtlEngine::new(ManifestPipeline::new(LocalStorage::default(), config)?);
    let output = engine.run().await?;
    assert!(output.ends_with("out/addresses.zip"));

    let zip_data = std::fs::read(temp_dir.path().join("out/addresses.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let mut csv_content = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("addresses.csv")?, &mut csv_content)?;
    assert!(csv_content.contains("1,张三 上海市徐汇区XX路100号 200030"));
    assert!(csv_content.contains("2,Jane Doe Tokyo 東京都"));
    assert!(archive.by_name("addresses.tsv").is_ok());

    let sheet = std::fs::read_to_string(temp_dir.path().join("sheet.csv"))?;
    assert_eq!(
        sheet,
        "订单号,备注,配送地址\n114-1,,张三 上海市徐汇区XX路100号 200030\n114-2,gift,Jane Doe Tokyo 東京都\n"
    );
    Ok(())
}
