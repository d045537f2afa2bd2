mod helpers;

use helpers::TestApp;
use smartmenu_notification::DeliveryReport;

async fn app_with_shopping_list() -> TestApp {
    let mut app = TestApp::new();
    app.generate_menu("2").await;
    app.post_text("/shopping-list", &[]).await;
    app
}

#[tokio::test]
async fn invalid_address_is_rejected_without_delivery() {
    let mut app = app_with_shopping_list().await;
    let before = {
        let planner = app.planner().await;
        planner.lock().await.shopping_list().clone()
    };

    for email in ["", "cocina", "cocina@example"] {
        let html = app
            .post_text("/email/shopping-list", &[("email", email)])
            .await;
        assert!(html.contains("Enter a valid email address"), "{email}");
    }

    assert!(app.mailer.sent().is_empty());

    let planner = app.planner().await;
    assert_eq!(planner.lock().await.shopping_list(), &before);
}

#[tokio::test]
async fn delivery_failure_is_shown_verbatim_and_changes_nothing() {
    let mut app = app_with_shopping_list().await;
    app.mailer
        .answer_with(DeliveryReport::failed("The smartmenu.cl domain is not verified"));

    let html = app
        .post_text("/email/shopping-list", &[("email", "cocina@example.cl")])
        .await;
    assert!(html.contains("toast-error"));
    assert!(html.contains("<strong>We could not send the email</strong>"));
    assert!(html.contains("<p>The smartmenu.cl domain is not verified</p>"));
    assert_eq!(app.mailer.sent().len(), 1);

    let planner = app.planner().await;
    let planner = planner.lock().await;
    assert_eq!(planner.shopping_list().ready().unwrap().len(), 3);
    assert_eq!(planner.selections().len(), 2);
}

#[tokio::test]
async fn menu_is_sent_in_the_request_language() {
    let mut app = TestApp::new();
    app.generate_menu("2").await;

    let html = app
        .post_text("/email/menu", &[("email", "cocina@example.cl")])
        .await;
    assert!(html.contains("Email sent to cocina@example.cl"));

    let sent = app.mailer.sent();
    assert_eq!(sent[0].to, "cocina@example.cl");
    assert_eq!(sent[0].subject, "Your selected menu");
    assert!(sent[0].plain.contains("Pastel de choclo"));
    assert!(sent[0].plain.contains("Cazuela de vacuno"));
}

#[tokio::test]
async fn artifacts_not_computed_are_not_sent() {
    let mut app = TestApp::new();
    app.generate_menu("1").await;

    let html = app
        .post_text("/email/nutrition", &[("email", "cocina@example.cl")])
        .await;
    assert!(html.contains("There is nothing to send yet"));
    assert!(app.mailer.sent().is_empty());
}
