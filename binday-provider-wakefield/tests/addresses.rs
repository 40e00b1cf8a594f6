//! Postcode lookup against synthetic search pages.

use std::sync::Arc;

use binday_core::{
    AddressPort, AddressResult, BindayService, CouncilId, Councils, PluginRegistry,
    PostcodeQuery, ScrapeError,
};
use binday_html::StaticDocumentProvider;
use binday_provider_wakefield::{WakefieldAddressPort, WakefieldConfig, plugin};
use pretty_assertions::assert_eq;
use url::Url;

const LANDING_URL: &str = "https://www.wakefield.gov.uk/where-i-live/";
const RESULTS_URL: &str = "https://www.wakefield.gov.uk/where-i-live/?q=WF1+2HQ";

const LANDING_PAGE: &str = r#"
<html>
<head><title>Where I live - Wakefield Council</title></head>
<body>
  <form action="/where-i-live/" method="get">
    <label for="where-i-live">Enter your postcode</label>
    <input type="search" id="where-i-live" name="q" value="Search">
  </form>
</body>
</html>
"#;

const NO_RESULTS_PAGE: &str = r#"
<html>
<head><title>Pick an address - Wakefield Council</title></head>
<body><p>We could not find any addresses for that postcode.</p></body>
</html>
"#;

const RESULTS_PAGE: &str = r#"
<html>
<head><title>Pick an address - Wakefield Council</title></head>
<body>
  <div class="u-mb-6">
    <ul>
      <li><a href="/where-i-live/property/12-high-street">12 High Street</a></li>
      <li><a href="/where-i-live/property/12-high-street?flat=a">Flat A, 12 High Street</a></li>
    </ul>
  </div>
  <div class="u-mb-6">
    <ul>
      <li><a href=" /where-i-live/property/14-high-street ">14 High Street</a></li>
    </ul>
  </div>
</body>
</html>
"#;

fn url(text: &str) -> Url {
    Url::parse(text).expect("valid test url")
}

fn provider(results: &str) -> StaticDocumentProvider {
    StaticDocumentProvider::new()
        .with_page(&url(LANDING_URL), LANDING_PAGE)
        .with_page(&url(RESULTS_URL), results)
}

fn port(provider: StaticDocumentProvider) -> WakefieldAddressPort {
    WakefieldAddressPort::new(Arc::new(provider), WakefieldConfig::default())
}

#[tokio::test]
async fn unknown_postcode_yields_no_addresses() {
    let addresses = port(provider(NO_RESULTS_PAGE))
        .search(&PostcodeQuery::new("WF1 2HQ"))
        .await
        .expect("lookup");

    assert!(addresses.is_empty(), "no addresses: {addresses:?}");
}

#[tokio::test]
async fn first_entry_of_each_group_becomes_an_absolute_address() {
    let addresses = port(provider(RESULTS_PAGE))
        .search(&PostcodeQuery::new(" wf1 2hq"))
        .await
        .expect("lookup");

    assert_eq!(
        addresses,
        vec![
            AddressResult {
                address: "12 High Street".to_owned(),
                url: url("https://www.wakefield.gov.uk/where-i-live/property/12-high-street"),
            },
            AddressResult {
                address: "14 High Street".to_owned(),
                url: url("https://www.wakefield.gov.uk/where-i-live/property/14-high-street"),
            },
        ]
    );
}

#[tokio::test]
async fn links_resolve_against_the_configured_origin() {
    let mirror = url("https://mirror.test/");
    let provider = StaticDocumentProvider::new()
        .with_page(&url("https://mirror.test/where-i-live/"), LANDING_PAGE)
        .with_page(&url("https://mirror.test/where-i-live/?q=WF1+2HQ"), RESULTS_PAGE);
    let port = WakefieldAddressPort::new(Arc::new(provider), WakefieldConfig::new(mirror));

    let addresses = port
        .search(&PostcodeQuery::new("WF1 2HQ"))
        .await
        .expect("lookup");

    assert_eq!(
        addresses.first().map(|found| found.url.as_str()),
        Some("https://mirror.test/where-i-live/property/12-high-street")
    );
}

#[tokio::test]
async fn empty_postcode_does_not_touch_the_site() {
    let port = port(StaticDocumentProvider::new());

    let addresses = port
        .search(&PostcodeQuery::new("   "))
        .await
        .expect("lookup");

    assert!(addresses.is_empty(), "no addresses: {addresses:?}");
}

#[tokio::test]
async fn mistitled_landing_page_is_fatal() {
    let provider = StaticDocumentProvider::new().with_page(
        &url(LANDING_URL),
        "<html><head><title>Service unavailable</title></head></html>",
    );

    let result = port(provider).search(&PostcodeQuery::new("WF1 2HQ")).await;

    assert!(
        matches!(
            result,
            Err(ScrapeError::UnexpectedPage {
                expected: "Where",
                ..
            })
        ),
        "landing page: {result:?}"
    );
}

#[tokio::test]
async fn search_must_reach_the_pick_list() {
    let result = port(provider(
        "<html><head><title>Where I live</title></head></html>",
    ))
    .search(&PostcodeQuery::new("WF1 2HQ"))
    .await;

    assert!(
        matches!(
            result,
            Err(ScrapeError::UnexpectedPage {
                expected: "Pick",
                ..
            })
        ),
        "results page: {result:?}"
    );
}

#[tokio::test]
async fn group_without_link_is_fatal() {
    let result = port(provider(
        r#"<html><head><title>Pick an address</title></head>
           <body><div class="u-mb-6"><ul><li>12 High Street</li></ul></div></body></html>"#,
    ))
    .search(&PostcodeQuery::new("WF1 2HQ"))
    .await;

    assert!(
        matches!(result, Err(ScrapeError::MissingElement(_))),
        "missing link: {result:?}"
    );
}

#[tokio::test]
async fn service_routes_lookups_to_the_council_plugin() {
    let registry = PluginRegistry::new(vec![plugin(
        Arc::new(provider(RESULTS_PAGE)),
        WakefieldConfig::default(),
    )]);
    let service = BindayService::new(Arc::new(registry));
    let council: CouncilId = Councils::Wakefield.into();

    assert_eq!(
        service.councils(),
        vec![(council.clone(), "Wakefield".to_owned())]
    );

    let addresses = service
        .lookup_addresses(&council, &PostcodeQuery::new("WF1 2HQ"))
        .await
        .expect("lookup");
    assert_eq!(addresses.len(), 2);

    let unknown = service
        .lookup_addresses(
            &CouncilId("leeds".to_owned()),
            &PostcodeQuery::new("LS1 1UR"),
        )
        .await;
    assert!(
        matches!(unknown, Err(ScrapeError::UnsupportedCouncil)),
        "unknown council: {unknown:?}"
    );
}
