#![allow(clippy::unwrap_used)]
// Integration tests for `RegonClient` against a mocked BIR endpoint.

use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use regon_core::{
    ClientConfig, Classification, ContactView, CoreError, EntitySummary, RegonClient, SearchQuery,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn setup() -> (MockServer, RegonClient) {
    init_tracing();
    let server = MockServer::start().await;
    let config = ClientConfig::sandbox().with_endpoint(Url::parse(&server.uri()).unwrap());
    let client = RegonClient::new(&config).unwrap();

    Mock::given(method("POST"))
        .and(body_string_contains("<ns:Zaloguj>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_reply("Zaloguj", "sid-7")))
        .mount(&server)
        .await;

    (server, client)
}

/// MTOM-wrapped SOAP 1.2 reply carrying `result` as the operation result.
fn soap_reply(operation: &str, result: &str) -> String {
    let escaped = result
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "--uuid:c2\r\nContent-Type: application/xop+xml;charset=utf-8\r\n\r\n\
         <s:Envelope xmlns:s=\"http://www.w3.org/2003/05/soap-envelope\"><s:Body>\
         <{operation}Response xmlns=\"http://CIS/BIR/PUBL/2014/07\">\
         <{operation}Result>{escaped}</{operation}Result>\
         </{operation}Response></s:Body></s:Envelope>\r\n--uuid:c2--\r\n"
    )
}

async fn mount_operation(
    server: &MockServer,
    operation: &str,
    body_marker: &str,
    result: &str,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(body_string_contains(format!("<ns:{operation}>")))
        .and(body_string_contains(body_marker))
        .and(header("sid", "sid-7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_reply(operation, result)))
        .expect(times)
        .mount(server)
        .await;
}

const SEARCH_RESULT: &str = "<root><dane>\
    <Regon>000331501</Regon><Nip>5261040828</Nip><StatusNip/>\
    <Nazwa>GŁÓWNY URZĄD STATYSTYCZNY</Nazwa>\
    <Wojewodztwo>MAZOWIECKIE</Wojewodztwo><Powiat>m. st. Warszawa</Powiat>\
    <Gmina>Śródmieście</Gmina><Miejscowosc>Warszawa</Miejscowosc>\
    <KodPocztowy>00-925</KodPocztowy><NrNieruchomosci>208</NrNieruchomosci>\
    <NrLokalu/><Typ>P</Typ><SilosID>6</SilosID><DataZakonczeniaDzialalnosci/>\
    <MiejscowoscPoczty>Warszawa</MiejscowoscPoczty>\
    </dane></root>";

const NOT_FOUND: &str = "<root><dane><ErrorCode>4</ErrorCode>\
    <ErrorMessagePl>Nie znaleziono podmiotu dla podanych kryteriów wyszukiwania.</ErrorMessagePl>\
    <ErrorMessageEn>No data found for the specified search criteria.</ErrorMessageEn>\
    <Nip>0000000000</Nip></dane></root>";

const LEGAL_REPORT: &str = "<root><dane>\
    <praw_regon9>000331501</praw_regon9><praw_nip>5261040828</praw_nip>\
    <praw_nazwa>GŁÓWNY URZĄD STATYSTYCZNY</praw_nazwa>\
    <praw_numerTelefonu>226083000</praw_numerTelefonu>\
    <praw_numerWewnetrznyTelefonu/><praw_numerFaksu>226083863</praw_numerFaksu>\
    <praw_adresEmail>dgsek@stat.gov.pl</praw_adresEmail>\
    <praw_adresStronyinternetowej>www.stat.gov.pl</praw_adresStronyinternetowej>\
    </dane></root>";

const LEGAL_CLASSIFICATION: &str = "<root>\
    <dane><praw_pkdKod>8411Z</praw_pkdKod>\
    <praw_pkdNazwa>KIERÓW. PODST. RODZAJAMI DZIAŁALNOŚCI PUBLICZNEJ</praw_pkdNazwa>\
    <praw_pkdPrzewazajace>1</praw_pkdPrzewazajace></dane>\
    <dane><praw_pkdKod>5811Z</praw_pkdKod><praw_pkdNazwa>WYDAWANIE KSIĄŻEK</praw_pkdNazwa>\
    <praw_pkdPrzewazajace>0</praw_pkdPrzewazajace></dane>\
    </root>";

const INDIVIDUAL_CLASSIFICATION: &str = "<root>\
    <dane><fiz_pkd_Kod>6201Z</fiz_pkd_Kod>\
    <fiz_pkd_Nazwa>DZIAŁALNOŚĆ ZWIĄZANA Z OPROGRAMOWANIEM</fiz_pkd_Nazwa>\
    <fiz_pkd_Przewazajace>1</fiz_pkd_Przewazajace><fiz_SilosID>1</fiz_SilosID></dane>\
    <dane><fiz_pkd_Kod>6202Z</fiz_pkd_Kod><fiz_pkd_Nazwa/>\
    <fiz_pkd_Przewazajace>0</fiz_pkd_Przewazajace><fiz_SilosID>1</fiz_SilosID></dane>\
    </root>";

fn legal_summary() -> EntitySummary {
    EntitySummary {
        regon: Some("000331501".into()),
        typ: Some("P".into()),
        silos_id: Some("6".into()),
        ..EntitySummary::default()
    }
}

// ── Search ──────────────────────────────────────────────────────────

#[tokio::test]
async fn search_by_nip_returns_summaries() {
    let (server, client) = setup().await;
    mount_operation(
        &server,
        "DaneSzukajPodmioty",
        "<dat:Nip>5261040828</dat:Nip>",
        SEARCH_RESULT,
        1,
    )
    .await;

    let found = client.search(&SearchQuery::nip("5261040828")).await.unwrap();

    assert_eq!(found.len(), 1);
    let entity = &found[0];
    assert_eq!(entity.regon.as_deref(), Some("000331501"));
    assert_eq!(entity.nazwa.as_deref(), Some("GŁÓWNY URZĄD STATYSTYCZNY"));
    assert_eq!(entity.silos_id.as_deref(), Some("6"));
    assert_eq!(entity.typ.as_deref(), Some("P"));
    // Empty elements stay null; fields the service left out are null too.
    assert_eq!(entity.nr_lokalu, None);
    assert_eq!(entity.ulica, None);
}

#[tokio::test]
async fn search_not_found_is_an_api_error() {
    let (server, client) = setup().await;
    mount_operation(&server, "DaneSzukajPodmioty", "<dat:Nip>", NOT_FOUND, 1).await;

    let err = client
        .search(&SearchQuery::nip("0000000000"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        CoreError::RegonApi { message, code } => {
            assert_eq!(message, "No data found for the specified search criteria.");
            assert_eq!(code, Some(4));
        }
        other => panic!("expected RegonApi, got {other:?}"),
    }
}

#[tokio::test]
async fn search_with_empty_result_is_reported() {
    let (server, client) = setup().await;
    mount_operation(&server, "DaneSzukajPodmioty", "<dat:Regon>", "", 1).await;

    let err = client
        .search(&SearchQuery::regon("000331501"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::EmptyResponse), "got {err:?}");
}

#[tokio::test]
async fn search_without_criteria_makes_no_request() {
    let (server, client) = setup().await;
    mount_operation(&server, "DaneSzukajPodmioty", "", SEARCH_RESULT, 0).await;

    let err = client.search(&SearchQuery::default()).await.unwrap_err();
    assert!(matches!(err, CoreError::MissingSearchCriterion));
    assert!(!client.session().is_bound());
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn full_report_strips_prefixes() {
    let (server, client) = setup().await;
    mount_operation(
        &server,
        "DanePobierzPelnyRaport",
        "<ns:pNazwaRaportu>BIR11OsPrawna</ns:pNazwaRaportu>",
        LEGAL_REPORT,
        1,
    )
    .await;

    let report = client.full_report(&legal_summary()).await.unwrap();

    assert_eq!(report.get("regon9"), Some("000331501"));
    assert_eq!(report.get("nazwa"), Some("GŁÓWNY URZĄD STATYSTYCZNY"));
    assert!(report.contains("numer_wewnetrzny_telefonu"));
    assert_eq!(report.get("numer_wewnetrzny_telefonu"), None);
    assert!(report.fields().keys().all(|k| !k.starts_with("praw")));

    let contact = client.contact(&report).unwrap();
    assert_eq!(
        contact,
        ContactView {
            nr_telefonu: Some("226083000".into()),
            nr_wewnetrzny_telefonu: None,
            nr_faksu: Some("226083863".into()),
            email: Some("dgsek@stat.gov.pl".into()),
            www: Some("www.stat.gov.pl".into()),
        }
    );
}

#[tokio::test]
async fn full_report_of_incomplete_summary_makes_no_request() {
    let (server, client) = setup().await;
    mount_operation(&server, "DanePobierzPelnyRaport", "", LEGAL_REPORT, 0).await;

    let summary = EntitySummary {
        typ: None,
        ..legal_summary()
    };
    match client.full_report(&summary).await {
        Err(CoreError::InvalidSummaryRecord { missing }) => assert_eq!(missing, ["typ"]),
        other => panic!("expected InvalidSummaryRecord, got {other:?}"),
    }
}

#[tokio::test]
async fn full_report_requires_silos_id_for_every_kind() {
    let (server, client) = setup().await;
    mount_operation(&server, "DanePobierzPelnyRaport", "", LEGAL_REPORT, 0).await;

    let summary = EntitySummary {
        silos_id: None,
        ..legal_summary()
    };
    match client.full_report(&summary).await {
        Err(CoreError::InvalidSummaryRecord { missing }) => assert_eq!(missing, ["silos_id"]),
        other => panic!("expected InvalidSummaryRecord, got {other:?}"),
    }
}

#[tokio::test]
async fn full_report_of_unknown_shape_makes_no_request() {
    let (server, client) = setup().await;
    mount_operation(&server, "DanePobierzPelnyRaport", "", LEGAL_REPORT, 0).await;

    let summary = EntitySummary {
        typ: Some("F".into()),
        silos_id: Some("9".into()),
        ..legal_summary()
    };
    let err = client.full_report(&summary).await.unwrap_err();
    assert!(matches!(err, CoreError::UnknownReportShape { .. }), "got {err:?}");
}

#[tokio::test]
async fn classification_report_parses_primary_flag() {
    let (server, client) = setup().await;
    mount_operation(
        &server,
        "DanePobierzPelnyRaport",
        "<ns:pNazwaRaportu>PublDaneRaportDzialalnosciPrawnej</ns:pNazwaRaportu>",
        LEGAL_CLASSIFICATION,
        1,
    )
    .await;

    let entries = client.classification_report(&legal_summary()).await.unwrap();

    assert_eq!(
        entries,
        vec![
            Classification {
                kod: Some("8411Z".into()),
                nazwa: Some("KIERÓW. PODST. RODZAJAMI DZIAŁALNOŚCI PUBLICZNEJ".into()),
                przewazajace: Some(true),
            },
            Classification {
                kod: Some("5811Z".into()),
                nazwa: Some("WYDAWANIE KSIĄŻEK".into()),
                przewazajace: Some(false),
            },
        ]
    );
}

#[tokio::test]
async fn classification_report_of_individual() {
    let (server, client) = setup().await;
    mount_operation(
        &server,
        "DanePobierzPelnyRaport",
        "<ns:pNazwaRaportu>PublDaneRaportDzialalnosciFizycznej</ns:pNazwaRaportu>",
        INDIVIDUAL_CLASSIFICATION,
        1,
    )
    .await;

    let summary = EntitySummary {
        regon: Some("012345678".into()),
        typ: Some("F".into()),
        silos_id: Some("1".into()),
        ..EntitySummary::default()
    };
    let entries = client.classification_report(&summary).await.unwrap();

    assert_eq!(
        entries,
        vec![
            Classification {
                kod: Some("6201Z".into()),
                nazwa: Some("DZIAŁALNOŚĆ ZWIĄZANA Z OPROGRAMOWANIEM".into()),
                przewazajace: Some(true),
            },
            Classification {
                kod: Some("6202Z".into()),
                nazwa: None,
                przewazajace: Some(false),
            },
        ]
    );
}

#[tokio::test]
async fn lookups_share_one_login() {
    let server = MockServer::start().await;
    let config = ClientConfig::sandbox().with_endpoint(Url::parse(&server.uri()).unwrap());
    let client = RegonClient::new(&config).unwrap();

    Mock::given(method("POST"))
        .and(body_string_contains("<ns:Zaloguj>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_reply("Zaloguj", "sid-7")))
        .expect(1)
        .mount(&server)
        .await;
    mount_operation(&server, "DaneSzukajPodmioty", "<dat:Nip>", SEARCH_RESULT, 1).await;
    mount_operation(&server, "DanePobierzPelnyRaport", "BIR11OsPrawna", LEGAL_REPORT, 1).await;

    let found = client.search(&SearchQuery::nip("5261040828")).await.unwrap();
    let report = client.full_report(&found[0]).await.unwrap();
    assert_eq!(report.get("nip"), Some("5261040828"));
    assert!(client.session().is_bound());
}

// ── Derived views ───────────────────────────────────────────────────

#[tokio::test]
async fn address_of_search_result() {
    let (server, client) = setup().await;
    mount_operation(&server, "DaneSzukajPodmioty", "<dat:Nip>", SEARCH_RESULT, 1).await;

    let found = client.search(&SearchQuery::nip("5261040828")).await.unwrap();
    let address = client.address(&found[0]).unwrap();

    assert_eq!(address.adres.as_deref(), Some("208"));
    assert_eq!(address.miejscowosc.as_deref(), Some("Warszawa"));
    assert_eq!(address.kod_pocztowy.as_deref(), Some("00-925"));
    assert_eq!(address.wojewodztwo.as_deref(), Some("MAZOWIECKIE"));
}
