mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, create_author, create_book, delete, get, post, put};

#[tokio::test]
async fn create_embeds_author_and_sets_location() {
    let app = app().await;
    let author = create_author(&app, "Leo Tolstoy").await;

    let response = post(
        &app,
        "/api/books",
        json!({
            "title": "War and Peace",
            "isbn": "978-0199232765",
            "publishedDate": "1869-01-01",
            "author": { "id": author }
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    let id = body["id"].as_i64().unwrap();
    assert_eq!(response.location.as_deref(), Some(format!("/api/books/{id}").as_str()));
    assert_eq!(
        body,
        json!({
            "id": id,
            "title": "War and Peace",
            "isbn": "978-0199232765",
            "publishedDate": "1869-01-01",
            "author": { "id": author, "name": "Leo Tolstoy", "bio": null }
        })
    );

    assert_eq!(get(&app, &format!("/api/books/{id}")).await.json(), body);
}

#[tokio::test]
async fn create_without_author_id_is_rejected() {
    let app = app().await;

    for body in [
        json!({ "title": "Orphan" }),
        json!({ "title": "Orphan", "author": {} }),
    ] {
        let response = post(&app, "/api/books", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["error"]["details"][0]["field"], "author.id");
    }
}

#[tokio::test]
async fn create_with_unknown_author_is_rejected() {
    let app = app().await;

    let response = post(
        &app,
        "/api/books",
        json!({ "title": "Ghost", "author": { "id": 999 } }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["message"], "Author not found");
    assert_eq!(get(&app, "/api/books").await.json()["totalElements"], 0);
}

#[tokio::test]
async fn create_with_blank_title_is_rejected() {
    let app = app().await;
    let author = create_author(&app, "Leo Tolstoy").await;

    let response = post(
        &app,
        "/api/books",
        json!({ "title": "  ", "author": { "id": author } }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["details"][0]["field"], "title");
}

#[tokio::test]
async fn unknown_book_is_404_with_empty_body() {
    let app = app().await;

    let response = get(&app, "/api/books/12345").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.bytes.is_empty());
}

#[tokio::test]
async fn update_ignores_unknown_author() {
    let app = app().await;
    let author = create_author(&app, "Leo Tolstoy").await;
    let id = create_book(&app, "War & Peace", author).await;

    let response = put(
        &app,
        &format!("/api/books/{id}"),
        json!({ "title": "War and Peace", "author": { "id": 999 } }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["title"], "War and Peace");
    assert_eq!(body["author"]["id"], author);
}

#[tokio::test]
async fn update_switches_to_existing_author() {
    let app = app().await;
    let tolstoy = create_author(&app, "Leo Tolstoy").await;
    let austen = create_author(&app, "Jane Austen").await;
    let id = create_book(&app, "Emma", tolstoy).await;

    let response = put(
        &app,
        &format!("/api/books/{id}"),
        json!({ "title": "Emma", "isbn": "978-0141439587", "author": { "id": austen } }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["author"]["name"], "Jane Austen");
    assert_eq!(body["isbn"], "978-0141439587");
}

#[tokio::test]
async fn update_unknown_book_is_404() {
    let app = app().await;

    let response = put(&app, "/api/books/77", json!({ "title": "Nothing" })).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_book_only() {
    let app = app().await;
    let author = create_author(&app, "Leo Tolstoy").await;
    let id = create_book(&app, "War and Peace", author).await;

    assert_eq!(
        delete(&app, &format!("/api/books/{id}")).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        get(&app, &format!("/api/books/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&app, &format!("/api/authors/{author}")).await.status,
        StatusCode::OK
    );
    assert_eq!(
        delete(&app, &format!("/api/books/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn listing_pages_through_all_books() {
    let app = app().await;
    let author = create_author(&app, "Prolific").await;
    for n in 1..=25 {
        create_book(&app, &format!("Volume {n:02}"), author).await;
    }

    let first = get(&app, "/api/books?page=0&size=10").await.json();
    assert_eq!(first["content"].as_array().unwrap().len(), 10);
    assert_eq!(first["totalElements"], 25);
    assert_eq!(first["totalPages"], 3);
    assert_eq!(first["number"], 0);
    assert_eq!(first["first"], true);
    assert_eq!(first["last"], false);

    let last = get(&app, "/api/books?page=2&size=10").await.json();
    assert_eq!(last["numberOfElements"], 5);
    assert_eq!(last["last"], true);
    assert_eq!(last["content"][4]["title"], "Volume 25");

    let beyond = get(&app, "/api/books?page=5&size=10").await.json();
    assert_eq!(beyond["empty"], true);
    assert_eq!(beyond["totalElements"], 25);
}

#[tokio::test]
async fn listing_defaults_to_twenty_per_page() {
    let app = app().await;
    let author = create_author(&app, "Prolific").await;
    for n in 1..=21 {
        create_book(&app, &format!("Volume {n:02}"), author).await;
    }

    let page = get(&app, "/api/books").await.json();
    assert_eq!(page["size"], 20);
    assert_eq!(page["numberOfElements"], 20);
}

#[tokio::test]
async fn listing_sorts_by_title_descending() {
    let app = app().await;
    let author = create_author(&app, "Various").await;
    for title in ["Beta", "Alpha", "Gamma"] {
        create_book(&app, title, author).await;
    }

    let page = get(&app, "/api/books?sort=title,desc").await.json();
    let titles: Vec<_> = page["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Gamma", "Beta", "Alpha"]);
}

#[tokio::test]
async fn listing_rejects_unknown_sort_property() {
    let app = app().await;

    let response = get(&app, "/api/books?sort=price,asc").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["code"], "bad_request");
}

#[tokio::test]
async fn empty_query_parameters_count_as_absent() {
    let app = app().await;
    let author = create_author(&app, "Various").await;
    create_book(&app, "War and Peace", author).await;
    create_book(&app, "Emma", author).await;

    let response = get(&app, "/api/books?authorId=&title=war&page=&size=&sort=").await;

    assert_eq!(response.status, StatusCode::OK);
    let page = response.json();
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["number"], 0);
    assert_eq!(page["size"], 20);
    assert_eq!(page["content"][0]["title"], "War and Peace");
}

#[tokio::test]
async fn malformed_query_value_uses_error_envelope() {
    let app = app().await;

    let response = get(&app, "/api/books?authorId=abc").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["code"], "bad_request");
}

#[tokio::test]
async fn repeated_sort_parameters_combine() {
    let app = app().await;
    let austen = create_author(&app, "Jane Austen").await;
    let tolstoy = create_author(&app, "Leo Tolstoy").await;
    create_book(&app, "Emma", austen).await;
    create_book(&app, "Anna Karenina", tolstoy).await;
    create_book(&app, "War and Peace", tolstoy).await;

    let response = get(&app, "/api/books?sort=authorId,desc&sort=title,asc").await;

    assert_eq!(response.status, StatusCode::OK);
    let titles: Vec<_> = response.json()["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Anna Karenina", "War and Peace", "Emma"]);
}

#[tokio::test]
async fn negative_page_and_size_fall_back_to_defaults() {
    let app = app().await;
    let author = create_author(&app, "Various").await;
    create_book(&app, "Emma", author).await;

    let response = get(&app, "/api/books?page=-1&size=-10").await;

    assert_eq!(response.status, StatusCode::OK);
    let page = response.json();
    assert_eq!(page["number"], 0);
    assert_eq!(page["size"], 20);
    assert_eq!(page["numberOfElements"], 1);
}

#[tokio::test]
async fn title_filter_folds_non_ascii_case() {
    let app = app().await;
    let author = create_author(&app, "Molière").await;
    create_book(&app, "L'ÉCOLE des femmes", author).await;
    create_book(&app, "Tartuffe", author).await;

    let page = get(&app, "/api/books?title=%C3%A9cole").await.json();

    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["title"], "L'ÉCOLE des femmes");
}

#[tokio::test]
async fn title_filter_is_case_insensitive_substring() {
    let app = app().await;
    let author = create_author(&app, "Various").await;
    create_book(&app, "War and Peace", author).await;
    create_book(&app, "The Art of War", author).await;
    create_book(&app, "Emma", author).await;

    let page = get(&app, "/api/books?title=war").await.json();

    assert_eq!(page["totalElements"], 2);
    let mut titles: Vec<_> = page["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["The Art of War", "War and Peace"]);
}

#[tokio::test]
async fn filters_combine_author_and_title() {
    let app = app().await;
    let tolstoy = create_author(&app, "Leo Tolstoy").await;
    let sun_tzu = create_author(&app, "Sun Tzu").await;
    create_book(&app, "War and Peace", tolstoy).await;
    create_book(&app, "Anna Karenina", tolstoy).await;
    create_book(&app, "The Art of War", sun_tzu).await;

    let by_author = get(&app, &format!("/api/books?authorId={tolstoy}")).await.json();
    assert_eq!(by_author["totalElements"], 2);

    let both = get(&app, &format!("/api/books?authorId={tolstoy}&title=WAR"))
        .await
        .json();
    assert_eq!(both["totalElements"], 1);
    assert_eq!(both["content"][0]["title"], "War and Peace");

    let blank_title = get(&app, &format!("/api/books?authorId={sun_tzu}&title=")).await.json();
    assert_eq!(blank_title["totalElements"], 1);
}

#[tokio::test]
async fn openapi_document_lists_resource_paths() {
    let app = app().await;

    let response = get(&app, "/docs/openapi.json").await;

    assert_eq!(response.status, StatusCode::OK);
    let paths = response.json()["paths"].clone();
    for path in [
        "/api/authors",
        "/api/authors/{id}",
        "/api/books",
        "/api/books/{id}",
        "/healthz",
    ] {
        assert!(paths.get(path).is_some(), "missing {path}");
    }
}

#[tokio::test]
async fn health_check_answers_ok() {
    let app = app().await;

    let response = get(&app, "/healthz").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"ok");
}
