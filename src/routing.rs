//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};

use crate::{
    AppState,
    csv_import::import_transactions_endpoint,
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.import_config.max_upload_bytes;

    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::IMPORT,
            post(import_transactions_endpoint).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, ImportConfig, endpoints, models::Transaction};

    use super::build_router;

    fn get_test_server() -> TestServer {
        get_test_server_with_config(ImportConfig::default())
    }

    fn get_test_server_with_config(import_config: ImportConfig) -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state =
            AppState::new(connection, import_config).expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    fn csv_form(csv: String) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(csv.into_bytes())
                .file_name("transactions.csv")
                .mime_type("text/csv"),
        )
    }

    /// A CSV file of `row_count` rows that are each 32 bytes long.
    fn make_csv(row_count: usize) -> String {
        let mut csv = String::from("title,type,value,category\n");
        for i in 0..row_count {
            csv.push_str(&format!("salary{i:06},income,100,Work000\n"));
        }
        csv
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = get_test_server();

        server
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let server = get_test_server();

        let response = server.get("/definitely/not/a/route").await;

        response.assert_status_not_found();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn create_list_and_delete_transactions() {
        let server = get_test_server();

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "salary",
                "value": 100,
                "type": "income",
                "category": "Work",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "tv",
                "value": "150",
                "type": "outcome",
                "category": "Electronics",
            }))
            .await;
        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["message"],
            "You don't have enough cash for this transaction. Your current cash is $100.00"
        );

        let groceries = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "groceries",
                "value": 50,
                "type": "Outcome",
                "category": "Food",
            }))
            .await
            .json::<Transaction>();

        let list = server.get(endpoints::TRANSACTIONS).await.json::<Value>();
        assert_eq!(list["transactions"].as_array().map(Vec::len), Some(2));
        assert_eq!(
            list["balance"],
            json!({"income": 100.0, "outcome": 50.0, "total": 50.0})
        );
        assert_eq!(list["transactions"][1]["type"], "outcome");
        assert_eq!(list["transactions"][1]["category"]["title"], "Food");

        let delete_path = format!("{}/{}", endpoints::TRANSACTIONS, groceries.id);
        server
            .delete(&delete_path)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server.delete(&delete_path).await.assert_status_not_found();

        let list = server.get(endpoints::TRANSACTIONS).await.json::<Value>();
        assert_eq!(list["balance"]["total"], 100.0);
    }

    #[tokio::test]
    async fn invalid_type_is_rejected() {
        let server = get_test_server();

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "gift",
                "value": 10,
                "type": "transfer",
                "category": "Gifts",
            }))
            .await
            .assert_status_bad_request();

        let list = server.get(endpoints::TRANSACTIONS).await.json::<Value>();
        assert_eq!(list["transactions"], json!([]));
    }

    #[tokio::test]
    async fn import_csv_file() {
        let server = get_test_server();
        let csv = "title,type,value,category\nrent,outcome,500,Housing\nsalary,income,2000,Work\n";

        let response = server
            .post(endpoints::IMPORT)
            .multipart(csv_form(csv.to_owned()))
            .await;

        response.assert_status(StatusCode::CREATED);
        let imported = response.json::<Vec<Transaction>>();
        let titles = imported
            .iter()
            .map(|transaction| transaction.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["rent", "salary"]);

        let list = server.get(endpoints::TRANSACTIONS).await.json::<Value>();
        assert_eq!(list["balance"]["total"], 1500.0);
    }

    #[tokio::test]
    async fn import_without_file_is_rejected() {
        let server = get_test_server();
        let form = MultipartForm::new().add_text("note", "no file here");

        server
            .post(endpoints::IMPORT)
            .multipart(form)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn import_over_upload_limit_is_413() {
        let server = get_test_server_with_config(ImportConfig {
            max_upload_bytes: 4096,
            ..Default::default()
        });
        let csv = make_csv(256);
        assert!(csv.len() > 4096);

        let response = server
            .post(endpoints::IMPORT)
            .multipart(csv_form(csv))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["message"],
            "The uploaded file is too large, the limit is 4096 bytes"
        );
        let list = server.get(endpoints::TRANSACTIONS).await.json::<Value>();
        assert_eq!(list["transactions"], json!([]));
    }

    #[tokio::test]
    async fn import_just_under_upload_limit_succeeds() {
        let server = get_test_server_with_config(ImportConfig {
            max_upload_bytes: 4096,
            ..Default::default()
        });
        // Leaves room for the multipart boundaries and headers.
        let csv = make_csv(110);
        assert!(csv.len() > 3500 && csv.len() < 4096);

        let response = server
            .post(endpoints::IMPORT)
            .multipart(csv_form(csv))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Vec<Transaction>>().len(), 110);
    }

    #[tokio::test]
    async fn non_numeric_value_is_json_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "salary",
                "value": "lots",
                "type": "income",
                "category": "Work",
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "error");
        assert!(
            body["message"].as_str().is_some_and(|message| message.contains("lots")),
            "want message about \"lots\", got {body}"
        );
    }

    #[tokio::test]
    async fn non_numeric_transaction_id_is_json_error() {
        let server = get_test_server();

        let response = server
            .delete(&format!("{}/abc", endpoints::TRANSACTIONS))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["status"], "error");
    }
}
