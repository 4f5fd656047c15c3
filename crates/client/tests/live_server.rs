use std::net::SocketAddr;
use std::time::Duration;

use codeshelf_client::{CatalogApi, CatalogView, ClientError, HttpCatalog, Mode, Outcome};
use codeshelf_kernel::settings::Settings;
use tokio::net::TcpListener;

async fn spawn_server(settings: Settings) -> SocketAddr {
    let registry = codeshelf_app::registry(&settings);
    let app = codeshelf_http::build_router(&registry, &settings);

    // Bind before spawning so the port is ready when the test connects
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn client_for(addr: SocketAddr) -> HttpCatalog {
    HttpCatalog::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn view_stays_in_step_with_server() {
    let addr = spawn_server(Settings::default()).await;
    let mut view = CatalogView::new(client_for(addr));

    assert_eq!(view.mount().await, Outcome::Confirmed);
    assert_eq!(view.books().len(), 9);

    view.set_title("X");
    view.set_author("Y");
    view.set_image("/z.jpg");
    assert_eq!(view.save().await, Outcome::Confirmed);
    let added = view.books().last().unwrap().clone();
    assert_eq!(added.id, 10);
    assert!(added.available);

    assert_eq!(view.toggle_availability(10).await, Outcome::Confirmed);
    assert_eq!(view.delete(4).await, Outcome::Confirmed);

    assert!(view.begin_edit(1));
    view.set_author("Workman");
    assert_eq!(view.save().await, Outcome::Confirmed);
    assert_eq!(view.mode(), Mode::Create);

    let server_books = view.api().list().await.unwrap();
    assert_eq!(view.books(), server_books.as_slice());
    assert_eq!(server_books.len(), 9);
    assert!(server_books.iter().all(|b| b.id != 4));
    assert!(!server_books.last().unwrap().available);
    assert_eq!(server_books[0].author, "Workman");
}

#[tokio::test]
async fn server_errors_surface_as_rejections() {
    let addr = spawn_server(Settings::default()).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/books"))
        .body("{oops")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);

    let mut settings = Settings::default();
    settings.catalog.strict_not_found = true;
    let addr = spawn_server(settings).await;
    let err = client_for(addr).delete(404).await.unwrap_err();
    match err {
        ClientError::Rejected { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Book not found!");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_leaves_empty_view() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut view = CatalogView::new(client_for(addr));
    assert_eq!(view.mount().await, Outcome::RolledBack);
    assert!(view.books().is_empty());

    view.set_title("Offline");
    assert_eq!(view.save().await, Outcome::RolledBack);
    assert!(view.books().is_empty());
}
