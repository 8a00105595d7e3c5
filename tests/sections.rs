//! Section loading against an in-process service and a live HTTP server.

#![allow(clippy::panic, missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use banner_gateway::api;
use banner_gateway::app_state::AppState;
use banner_gateway::domain::{BannerType, NewBanner};
use banner_gateway::persistence::{BannerStore, MemoryBannerStore};
use banner_gateway::resolver::ResolverOptions;
use banner_gateway::sections::{
    BannerSource, HttpBannerSource, LocationSection, RetryPolicy, SectionLoader, SectionView,
    ServiceBannerSource,
};
use banner_gateway::service::BannerService;

const TTL: Duration = Duration::from_secs(300);

fn new_banner(banner_type: BannerType, order: i32) -> NewBanner {
    NewBanner {
        title: format!("{banner_type} #{order}"),
        description: String::new(),
        banner_type,
        media: Vec::new(),
        cta_label: None,
        cta_link: None,
        location: Some("home".to_string()),
        is_active: true,
        order,
    }
}

async fn seeded_service() -> BannerService {
    let store: Arc<dyn BannerStore> = Arc::new(MemoryBannerStore::new());
    let service = BannerService::new(store, ResolverOptions::default(), TTL);
    for (banner_type, order) in [
        (BannerType::Carousel, 2),
        (BannerType::Carousel, 1),
        (BannerType::Type3, 1),
    ] {
        if service.create_banner(new_banner(banner_type, order)).await.is_err() {
            panic!("seeding failed");
        }
    }
    service
}

#[tokio::test]
async fn in_process_sections_render_non_empty_types() {
    let service = seeded_service().await;
    let source: Arc<dyn BannerSource> = Arc::new(ServiceBannerSource::new(service));
    let loader = SectionLoader::new(source, TTL);

    let views = loader.load_location("home").await;
    let types: Vec<BannerType> = views.iter().map(|(t, _)| *t).collect();
    assert_eq!(types, [BannerType::Carousel, BannerType::Type3]);

    let carousel = loader
        .load(&LocationSection::new("home", BannerType::Carousel))
        .await;
    let orders: Vec<i32> = carousel.banners().iter().map(|b| b.order).collect();
    assert_eq!(orders, [1, 2]);
}

#[tokio::test]
async fn http_source_reads_live_server() {
    let service = seeded_service().await;
    let app = api::build_router().with_state(AppState::new(service));
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let Ok(source) = HttpBannerSource::new(&format!("http://{addr}"), Duration::from_secs(5))
    else {
        panic!("valid base url");
    };
    let loader = SectionLoader::new(Arc::new(source), TTL);

    let view = loader
        .load(&LocationSection::new("home", BannerType::Type3))
        .await;
    assert_eq!(view.banners().len(), 1);

    let hidden = loader
        .load(&LocationSection::new("home", BannerType::Type1))
        .await;
    assert_eq!(hidden, SectionView::Hidden);
}

#[tokio::test]
async fn unreachable_server_hides_every_section() {
    let Ok(source) = HttpBannerSource::new("http://127.0.0.1:9", Duration::from_millis(200))
    else {
        panic!("valid base url");
    };
    let loader = SectionLoader::new(Arc::new(source), TTL);

    let type3 = LocationSection::new("home", BannerType::Type3)
        .with_retry(RetryPolicy::fixed(1, Duration::from_millis(10)));
    assert_eq!(type3.initial_view(), SectionView::Loading);
    assert!(loader.load(&type3).await.is_hidden());
    assert!(loader.load_location("home").await.is_empty());
}
