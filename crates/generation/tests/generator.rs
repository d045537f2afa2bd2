use std::sync::Arc;

use smartmenu_generation::{
    FakeImage, FakeProvider, GenerationError, Generator, PLACEHOLDER_IMAGE,
};
use smartmenu_menu::{Dish, DietaryPreference, MenuPreferences, ShoppingListRequest};

fn generator(provider: FakeProvider) -> (Generator, Arc<FakeProvider>) {
    let provider = Arc::new(provider);
    (Generator::new(provider.clone()), provider)
}

#[tokio::test]
async fn demo_menu_has_one_entry_per_requested_day() {
    let (generator, provider) = generator(FakeProvider::demo());
    let preferences = MenuPreferences {
        days: 9,
        people: 2,
        dietary: DietaryPreference::Vegetarian,
        ..Default::default()
    };

    let menu = generator.generate_menu(&preferences).await.unwrap();

    assert_eq!(menu.days.len(), 9);
    assert_eq!(
        menu.days.iter().map(|d| d.day).collect::<Vec<_>>(),
        (1..=9).collect::<Vec<_>>()
    );
    assert_eq!(menu.preferences, preferences);
    assert_eq!(menu.pending_images(), 18);
    assert_eq!(provider.calls("menu"), 1);
}

#[tokio::test]
async fn malformed_menu_is_an_invalid_output_error() {
    let (generator, _) =
        generator(FakeProvider::new().with_response("menu", r#"{"menu": "soon"}"#));

    let err = generator
        .generate_menu(&MenuPreferences::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidOutput(_)));
}

#[tokio::test]
async fn provider_failure_is_surfaced() {
    let provider = FakeProvider::demo();
    provider.fail("shopping_list");
    let (generator, _) = generator(provider);

    let request = ShoppingListRequest {
        dishes: vec![Dish {
            name: "Charquicán".to_owned(),
            ingredients: vec!["Zapallo: 300g".to_owned()],
        }],
    };

    let err = generator.create_shopping_list(&request).await.unwrap_err();
    assert!(matches!(err, GenerationError::ApiError { status: 503, .. }));
}

#[tokio::test]
async fn demo_shopping_list_merges_repeated_ingredients() {
    let (generator, _) = generator(FakeProvider::demo());
    let request = ShoppingListRequest {
        dishes: vec![
            Dish {
                name: "A".to_owned(),
                ingredients: vec!["Cebolla: 1".to_owned(), "Arroz: 1 taza".to_owned()],
            },
            Dish {
                name: "B".to_owned(),
                ingredients: vec!["Cebolla: 1".to_owned()],
            },
        ],
    };

    let list = generator.create_shopping_list(&request).await.unwrap();
    assert_eq!(list, vec!["Cebolla: 1".to_owned(), "Arroz: 1 taza".to_owned()]);
}

#[tokio::test]
async fn image_outcomes() {
    let (generator, provider) = generator(FakeProvider::new());

    assert_eq!(
        generator.generate_image("Humitas", None).await.unwrap().as_deref(),
        Some(PLACEHOLDER_IMAGE)
    );

    provider.set_image(FakeImage::Missing);
    assert_eq!(generator.generate_image("Humitas", None).await.unwrap(), None);

    provider.set_image(FakeImage::Fail);
    assert!(generator.generate_hero_image().await.is_err());
    assert_eq!(provider.calls("image"), 3);
}
