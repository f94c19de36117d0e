//! formats.txt generation against a mock set listing.

use lackey_fetch::formats::generate_formats_file;
use lackey_fetch::ScryfallClient;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn writes_formats_in_fixed_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "has_more": false,
            "data": [
                { "code": "DSK", "legalities": { "standard": "legal", "pioneer": "legal", "modern": "legal", "legacy": "legal" } },
                { "code": "lea", "legalities": { "legacy": "legal", "modern": "not_legal" } },
                { "code": "pmei" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("formats.txt");
    let target = output.clone();
    let base_url = server.uri();
    let formats = tokio::task::spawn_blocking(move || {
        let client = ScryfallClient::with_base_url(&base_url)?;
        generate_formats_file(&client, &target)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(formats.len(), 4);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "<formatdefinitions>\n\n\
         <format><label>Standard</label>\n\t<set>dsk</set>\n</format>\n\n\
         <format><label>Pioneer</label>\n\t<set>dsk</set>\n</format>\n\n\
         <format><label>Modern</label>\n\t<set>dsk</set>\n</format>\n\n\
         <format><label>Legacy</label>\n\t<set>dsk</set>\n\t<set>lea</set>\n</format>\n\n\
         </formatdefinitions>\n"
    );
}

#[tokio::test]
async fn failed_listing_writes_empty_definitions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("formats.txt");
    let target = output.clone();
    let base_url = server.uri();
    let formats = tokio::task::spawn_blocking(move || {
        let client = ScryfallClient::with_base_url(&base_url)?;
        generate_formats_file(&client, &target)
    })
    .await
    .unwrap()
    .unwrap();

    assert!(formats.is_empty());
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "<formatdefinitions>\n\n</formatdefinitions>\n"
    );
}
