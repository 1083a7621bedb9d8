//! Integration tests for the catalog client and CRUD controller using wiremock
//!
//! These tests drive the real HTTP stack against mocked endpoints, covering
//! the CRUD round trips, upload limits and failure handling.

use serde_json::json;
use std::time::Duration;
use tcat::api::{CatalogClient, UploadFile};
use tcat::error::{CrudError, FetchError, ValidationError};
use tcat::model::{Category, CategoryPayload, Color, ColorPayload, ListFilter, Product, ProductPayload};
use tcat::notification::{NotificationManager, NotificationStatus};
use tcat::resource::{Dialog, ResourceTable, ViewAction};
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&server.uri(), Duration::from_secs(5)).expect("valid base URL")
}

fn png(name: &str) -> UploadFile {
    UploadFile::new(name, "image/png", b"PNGDATA".to_vec())
}

fn products_json() -> serde_json::Value {
    json!([
        {"id": 7, "name": "Runner", "subName": "Trail", "description": "", "categoryId": 1,
         "photos": [], "Category": {"id": 1, "name": "Shoes"}, "Colors": []},
        {"id": 8, "name": "Loafer", "subName": null, "description": null, "categoryId": 1}
    ])
}

/// Test module for gateway-level behavior
mod gateway_tests {
    use super::*;

    /// List endpoints append the filter as a query string
    #[tokio::test]
    async fn test_list_sends_filter_as_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/product"))
            .and(query_param("categoryId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_json()))
            .expect(1)
            .mount(&server)
            .await;

        let products: Vec<Product> = client(&server)
            .list(&ListFilter::by("categoryId", 1))
            .await
            .expect("list should succeed");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category.as_ref().map(|c| c.name.as_str()), Some("Shoes"));
        assert_eq!(products[1].sub_name, "");
    }

    /// The joined view decodes nested products
    #[tokio::test]
    async fn test_fetch_all_decodes_nested_products() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Shoes", "Products": products_json()},
                {"id": 2, "name": "Hats", "Products": null}
            ])))
            .mount(&server)
            .await;

        let categories = client(&server).fetch_all().await.unwrap();
        assert_eq!(categories[0].products.len(), 2);
        assert!(categories[1].products.is_empty());
    }

    /// Non-2xx responses carry the status and the server's message
    #[tokio::test]
    async fn test_error_status_and_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/category"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "Category already exists"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .create::<Category>(&CategoryPayload { name: "Shoes".into() })
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::new(Some(409), "Category already exists"));
    }

    /// A server that is not listening yields a transport error without a status
    #[tokio::test]
    async fn test_connection_refused_has_no_status() {
        let client = CatalogClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.get::<Category>(1).await.unwrap_err();
        assert_eq!(err.status, None);
    }

    /// Slow responses are cut off by the client timeout
    #[tokio::test]
    async fn test_request_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/color"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = CatalogClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
        let err = client.list::<Color>(&ListFilter::new()).await.unwrap_err();
        assert!(err.is_timeout(), "unexpected error: {:?}", err);
    }
}

/// Test module for the CRUD controller
mod controller_tests {
    use super::*;

    /// Scenario B: create then load includes the new entity
    #[tokio::test]
    async fn test_create_then_load_contains_entity() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/category"))
            .and(body_json(json!({"name": "Hats"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2, "name": "Hats"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Shoes"},
                {"id": 2, "name": "Hats"}
            ])))
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Category>::new(client(&server));
        let mut notices = NotificationManager::new();

        let body = table
            .create(CategoryPayload { name: "Hats".into() }, &mut notices)
            .await
            .expect("create should succeed");
        assert_eq!(body["id"], 2);

        assert!(table.store.items().iter().any(|c| c.name == "Hats"));
        assert!(!table.is_busy());

        let notice = notices.latest().unwrap();
        assert_eq!(notice.status, NotificationStatus::Success);
        assert_eq!(notice.headline(), "Category added successfully");
    }

    /// Scenario C: deleting a missing id surfaces 404 and keeps the list
    #[tokio::test]
    async fn test_remove_missing_id_returns_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "Hats"}])))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/category/1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Category>::new(client(&server));
        let mut notices = NotificationManager::new();
        table.load(&mut notices).await.unwrap();
        let before = table.store.items().to_vec();

        let err = table.remove(1, &mut notices).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, CrudError::Fetch(ref e) if e.is_not_found()));
        assert_eq!(table.store.items(), before.as_slice());
        assert_eq!(notices.latest().unwrap().headline(), "Failed to delete category");
        assert!(!table.is_busy());
    }

    /// Product edits go to the product's own id, never the category id
    #[tokio::test]
    async fn test_update_uses_own_id() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/product/7"))
            .and(body_json(json!({
                "name": "Runner",
                "subName": "Road",
                "description": "",
                "categoryId": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/product/3"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_json()))
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();
        let payload = ProductPayload {
            name: "Runner".into(),
            sub_name: "Road".into(),
            description: String::new(),
            category_id: 3,
        };

        table.update(7, payload, &mut notices).await.unwrap();
        assert_eq!(notices.latest().unwrap().headline(), "Product updated successfully");
    }

    /// Loading twice without mutation yields identical lists
    #[tokio::test]
    async fn test_load_is_idempotent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_json()))
            .expect(2)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();
        table.store.apply_text_filter("run");

        table.load(&mut notices).await.unwrap();
        let items = table.store.items().to_vec();
        let filtered = table.store.filtered_indices().to_vec();

        table.load(&mut notices).await.unwrap();
        assert_eq!(table.store.items(), items.as_slice());
        assert_eq!(table.store.filtered_indices(), filtered.as_slice());
        // The term typed before the load still applies
        assert_eq!(filtered, vec![0]);
    }

    /// A failed load keeps the last good list and reports the error
    #[tokio::test]
    async fn test_failed_load_preserves_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/color"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Red", "hexCode": "#FF0000", "productId": 7}
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/color"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Color>::new(client(&server));
        let mut notices = NotificationManager::new();

        table.load(&mut notices).await.unwrap();
        let err = table.load(&mut notices).await.unwrap_err();

        assert_eq!(err.status, Some(503));
        assert_eq!(table.store.items().len(), 1);
        assert_eq!(notices.latest().unwrap().headline(), "Failed to load colors");
    }

    /// The busy flag is released after a failed mutation
    #[tokio::test]
    async fn test_busy_released_after_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/category"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/category"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Category>::new(client(&server));
        let mut notices = NotificationManager::new();

        let err = table
            .create(CategoryPayload { name: "Caps".into() }, &mut notices)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!table.is_busy());

        table
            .create(CategoryPayload { name: "Caps".into() }, &mut notices)
            .await
            .expect("second attempt should be accepted");
    }

    /// Required-field failures never reach the network
    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();
        let payload = ProductPayload {
            name: "Runner".into(),
            sub_name: String::new(),
            description: String::new(),
            category_id: 0,
        };

        let err = table.create(payload, &mut notices).await.unwrap_err();
        assert_eq!(err, CrudError::Validation(ValidationError::new("Category is required")));
    }

    /// A created entity closes the Add dialog and marks the notice as a success
    #[tokio::test]
    async fn test_submit_add_dialog_closes_on_created() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/category"))
            .and(body_json(json!({"name": "Hats"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2, "name": "Hats"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "Hats"}])))
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Category>::new(client(&server));
        let mut notices = NotificationManager::new();

        assert!(table.dispatch(ViewAction::OpenAdd));
        let form = table.view.dialog_mut().and_then(Dialog::form_mut).unwrap();
        "Hats".chars().for_each(|c| form.push_char(c));

        table
            .submit_dialog(&mut notices)
            .await
            .expect("a dialog is open")
            .expect("create should succeed");

        assert!(!table.view.is_open());
        assert_eq!(table.store.items().len(), 1);
        let notice = notices.latest().unwrap();
        assert_eq!(notice.status, NotificationStatus::Success);
        assert_eq!(notice.headline(), "Category added successfully");
    }

    /// A server error on create keeps the dialog open with the message in the form
    #[tokio::test]
    async fn test_submit_add_dialog_stays_open_on_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/category"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Category>::new(client(&server));
        let mut notices = NotificationManager::new();

        table.dispatch(ViewAction::OpenAdd);
        let form = table.view.dialog_mut().and_then(Dialog::form_mut).unwrap();
        "Caps".chars().for_each(|c| form.push_char(c));

        let err = table.submit_dialog(&mut notices).await.unwrap().unwrap_err();
        assert_eq!(err.status(), Some(500));

        let form = table.view.dialog().and_then(Dialog::form).expect("dialog stays open");
        assert_eq!(form.value("name"), Some("Caps"));
        assert_eq!(
            form.error.as_deref(),
            Some("Catalog service temporarily unavailable. Please try again.")
        );
        assert_eq!(notices.latest().unwrap().status, NotificationStatus::Error);
        assert!(!table.is_busy());
    }

    /// A server error on update keeps the Edit dialog open with the message in the form
    #[tokio::test]
    async fn test_submit_edit_dialog_stays_open_on_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/category/1"))
            .and(body_json(json!({"name": "Boots"})))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Category>::new(client(&server));
        let mut notices = NotificationManager::new();
        let shoes = Category {
            id: 1,
            name: "Shoes".into(),
            products: Vec::new(),
        };

        table.dispatch(ViewAction::OpenEdit(shoes));
        table
            .view
            .dialog_mut()
            .and_then(Dialog::form_mut)
            .unwrap()
            .set_value("name", "Boots");

        let err = table.submit_dialog(&mut notices).await.unwrap().unwrap_err();
        assert_eq!(err.status(), Some(503));

        let dialog = table.view.dialog().expect("dialog stays open");
        assert!(matches!(dialog, Dialog::Edit { id: 1, .. }));
        assert_eq!(
            dialog.form().and_then(|f| f.error.as_deref()),
            Some("Catalog service temporarily unavailable. Please try again.")
        );
    }
}

/// Test module for image uploads
mod upload_tests {
    use super::*;

    async fn product_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_json()))
            .mount(&server)
            .await;
        server
    }

    /// Scenario D: four files go out as repeated `photos` parts
    #[tokio::test]
    async fn test_four_product_photos_succeed() {
        let server = product_server().await;

        Mock::given(method("PATCH"))
            .and(path("/productimage/7"))
            .and(body_string_contains("name=\"photos\"; filename=\"3.png\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();
        let files = (0..4).map(|i| png(&format!("{}.png", i))).collect();

        table.upload_images(7, files, &mut notices).await.unwrap();
        assert_eq!(notices.latest().unwrap().status, NotificationStatus::Success);
        assert!(table.store.is_loaded());
    }

    /// Scenario D: zero files are rejected locally
    #[tokio::test]
    async fn test_zero_files_rejected_without_request() {
        let server = product_server().await;

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();

        let err = table.upload_images(7, vec![], &mut notices).await.unwrap_err();
        assert_eq!(err.to_string(), "Please select files to upload");
    }

    /// Five files exceed the product limit and are rejected locally
    #[tokio::test]
    async fn test_five_files_rejected_without_request() {
        let server = product_server().await;

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();
        let files = (0..5).map(|i| png(&format!("{}.png", i))).collect();

        let err = table.upload_images(7, files, &mut notices).await.unwrap_err();
        assert_eq!(err, CrudError::Validation(ValidationError::new("Maximum 4 files allowed")));
    }

    /// Color uploads take exactly one `photo` part
    #[tokio::test]
    async fn test_color_upload_single_photo() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/colorimage/5"))
            .and(body_string_contains("name=\"photo\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/color"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Color>::new(client(&server));
        let mut notices = NotificationManager::new();

        let err = table
            .upload_images(5, vec![png("a.png"), png("b.png")], &mut notices)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Exactly 1 file required");

        table.upload_images(5, vec![png("a.png")], &mut notices).await.unwrap();
    }

    /// Upload failures surface the server's message
    #[tokio::test]
    async fn test_upload_failure_surfaces_server_message() {
        let server = product_server().await;

        Mock::given(method("PATCH"))
            .and(path("/productimage/7"))
            .respond_with(ResponseTemplate::new(413).set_body_json(json!({"error": "File too large"})))
            .mount(&server)
            .await;

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();

        let err = table.upload_images(7, vec![png("big.png")], &mut notices).await.unwrap_err();
        assert_eq!(err.status(), Some(413));
        assert_eq!(
            notices.latest().unwrap().status,
            NotificationStatus::Error("File too large".into())
        );
    }

    /// Paths on disk are read and typed by extension
    #[tokio::test]
    async fn test_upload_paths_reads_files() {
        let server = product_server().await;

        Mock::given(method("PATCH"))
            .and(path("/productimage/7"))
            .and(body_string_contains("Content-Type: image/jpeg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("front.jpg");
        std::fs::write(&photo, b"JPEGDATA").unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "not an image").unwrap();

        let mut table = ResourceTable::<Product>::new(client(&server));
        let mut notices = NotificationManager::new();

        let err = table
            .upload_paths(7, &[notes], &mut notices)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Only image files can be uploaded");

        table.upload_paths(7, &[photo], &mut notices).await.unwrap();
    }
}

/// Test module for application-level navigation
mod app_tests {
    use super::*;
    use tcat::app::App;
    use tcat::config::Config;
    use tcat::resource::{ResourceKind, TableHandle};

    /// Drilling into a category filters products by its id; back restores
    #[tokio::test]
    async fn test_drill_down_and_back() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Shoes"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/product"))
            .and(query_param("categoryId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_json()))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = App::new(client(&server), Config::default(), false);
        app.load(ResourceKind::Category).await.unwrap();

        app.navigate_to_sub_resource().await.unwrap();
        assert_eq!(app.current, ResourceKind::Product);
        assert_eq!(app.table().filtered_len(), 2);
        assert_eq!(app.get_breadcrumb(), vec!["category:Shoes", "products"]);

        app.navigate_back().await.unwrap();
        assert_eq!(app.current, ResourceKind::Category);
        assert!(app.products.filter().is_empty());
        assert!(app.parent_context.is_none());
    }

    /// A product deleted under a category filter can no longer parent a color
    #[tokio::test]
    async fn test_deleted_product_rejected_as_color_parent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Shoes"}
            ])))
            .mount(&server)
            .await;

        // Drill-down listing, then the reload after the delete
        Mock::given(method("GET"))
            .and(path("/product"))
            .and(query_param("categoryId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_json()))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/product"))
            .and(query_param("categoryId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "name": "Runner", "categoryId": 1}
            ])))
            .mount(&server)
            .await;

        // Unfiltered listing
        Mock::given(method("GET"))
            .and(path("/product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_json()))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/product/8"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/color"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = App::new(client(&server), Config::default(), false);
        app.load(ResourceKind::Category).await.unwrap();
        app.load(ResourceKind::Product).await.unwrap();
        app.current = ResourceKind::Category;

        app.navigate_to_sub_resource().await.unwrap();
        assert_eq!(app.products.filter(), &ListFilter::by("categoryId", 1));

        app.products.remove(8, &mut app.notification_manager).await.unwrap();
        let ids: Vec<i64> = app.products.store.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7]);

        let payload = ColorPayload {
            name: "Red".into(),
            hex_code: None,
            product_id: 8,
        };
        let err = app
            .colors
            .create(payload, &mut app.notification_manager)
            .await
            .unwrap_err();
        assert_eq!(err, CrudError::Validation(ValidationError::new("Product 8 does not exist")));
    }

    /// Describe falls back to the cached row when get-by-id fails
    #[tokio::test]
    async fn test_describe_falls_back_to_cached_row() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Shoes"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/category/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = App::new(client(&server), Config::default(), false);
        app.load(ResourceKind::Category).await.unwrap();
        app.enter_describe_mode().await;

        assert_eq!(app.describe_data, Some(json!({"id": 1, "name": "Shoes"})));
        assert_eq!(
            app.notification_manager.latest().unwrap().headline(),
            "Failed to load categories"
        );
    }
}
