//! # Catalog Scenarios
//!
//! End-to-end checks through the public API: build with the editor, export,
//! open a session, query.

use larder_core::{
    Catalog, CatalogEditor, ChangeDetection, Ingredient, IngredientId, LarderError, Provenance,
    Query, QueryOutcome, Recipe, RecipeId, RecipeRef, SerializableCatalog, Session,
};

fn open(catalog: &Catalog) -> Session {
    let bytes = CatalogEditor::export(catalog).expect("export");
    Session::open(bytes, Provenance::FromRemote, ChangeDetection::ContentHash).expect("open")
}

/// Bread(1) uses Flour; Sandwich(2) uses Ham and has Bread as a sub-recipe.
fn sandwich() -> Catalog {
    let mut catalog = CatalogEditor::create_empty();
    let bread = CatalogEditor::add_recipe(&mut catalog, "Bread").expect("add");
    let sandwich = CatalogEditor::add_recipe(&mut catalog, "Sandwich").expect("add");
    let flour = CatalogEditor::add_ingredient(&mut catalog, "Flour").expect("add");
    let ham = CatalogEditor::add_ingredient(&mut catalog, "Ham").expect("add");
    CatalogEditor::link_ingredient(&mut catalog, bread, flour).expect("link");
    CatalogEditor::link_ingredient(&mut catalog, sandwich, ham).expect("link");
    CatalogEditor::link_subrecipe(&mut catalog, sandwich, bread).expect("link");
    catalog
}

#[test]
fn sandwich_needs_flour_through_bread() {
    let session = open(&sandwich());

    assert_eq!(
        session.resolve_ingredients(RecipeId(2)).expect("resolve"),
        Some(vec!["Flour".to_string(), "Ham".to_string()])
    );
    assert_eq!(
        session.resolve_ingredients(RecipeId(1)).expect("resolve"),
        Some(vec!["Flour".to_string()])
    );
}

#[test]
fn flour_search_finds_parent_recipes() {
    let session = open(&sandwich());

    assert_eq!(
        session.search_by_ingredient("FLO").expect("search"),
        vec![
            RecipeRef::new(RecipeId(1), "Bread"),
            RecipeRef::new(RecipeId(2), "Sandwich"),
        ]
    );
    assert_eq!(
        session.search_by_ingredient("ham").expect("search"),
        vec![RecipeRef::new(RecipeId(2), "Sandwich")]
    );
}

#[test]
fn recipe_without_ingredients_resolves_empty() {
    let mut catalog = CatalogEditor::create_empty();
    CatalogEditor::add_recipe(&mut catalog, "Water").expect("add");
    let session = open(&catalog);

    assert_eq!(
        session.resolve_ingredients(RecipeId(1)).expect("resolve"),
        Some(Vec::new())
    );
    assert_eq!(
        session.resolve_direct_subrecipes(RecipeId(1)).expect("subs"),
        Vec::new()
    );
}

#[test]
fn deep_chain_is_transitive() {
    let mut catalog = CatalogEditor::create_empty();
    let names = ["Club", "Sandwich", "Bread", "Dough"];
    let ids: Vec<RecipeId> = names
        .iter()
        .map(|n| CatalogEditor::add_recipe(&mut catalog, n).expect("add"))
        .collect();
    for pair in ids.windows(2) {
        CatalogEditor::link_subrecipe(&mut catalog, pair[0], pair[1]).expect("link");
    }
    let yeast = CatalogEditor::add_ingredient(&mut catalog, "Yeast").expect("add");
    CatalogEditor::link_ingredient(&mut catalog, ids[3], yeast).expect("link");
    let session = open(&catalog);

    assert_eq!(
        session.resolve_ingredients(ids[0]).expect("resolve"),
        Some(vec!["Yeast".to_string()])
    );
    let found: Vec<String> = session
        .search_by_ingredient("yeast")
        .expect("search")
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(found, vec!["Bread", "Club", "Dough", "Sandwich"]);
}

#[test]
fn self_subrecipe_rejected() {
    let mut catalog = sandwich();
    let result = CatalogEditor::link_subrecipe(&mut catalog, RecipeId(1), RecipeId(1));
    assert!(matches!(result, Err(LarderError::StructuralViolation(_))));
}

#[test]
fn missing_recipe_is_not_found() {
    let session = open(&sandwich());

    assert_eq!(session.resolve_ingredients(RecipeId(42)).expect("resolve"), None);
    assert_eq!(
        session.execute(&Query::recipe(RecipeId(42))).expect("query"),
        QueryOutcome::Recipe(None)
    );
}

#[test]
fn detail_view_combines_closure_and_children() {
    let session = open(&sandwich());
    let detail = session
        .resolve_detail(RecipeId(2))
        .expect("resolve")
        .expect("exists");

    assert_eq!(detail.recipe.name, "Sandwich");
    assert_eq!(detail.ingredients, vec!["Flour", "Ham"]);
    assert_eq!(detail.subrecipes, vec![RecipeRef::new(RecipeId(1), "Bread")]);
}

#[test]
fn repeated_names_survive_a_snapshot_and_sort_by_id() {
    let catalog = Catalog::from(SerializableCatalog {
        recipes: vec![
            Recipe::new(RecipeId(2), "Soup"),
            Recipe::new(RecipeId(1), "Soup"),
        ],
        ingredients: vec![Ingredient::new(IngredientId(1), "Salt")],
        recipe_ingredients: vec![(RecipeId(2), IngredientId(1)), (RecipeId(1), IngredientId(1))],
        recipe_components: vec![],
        next_recipe_id: 3,
        next_ingredient_id: 2,
    });
    let session = open(&catalog);

    assert_eq!(
        session.search_by_ingredient("salt").expect("search"),
        vec![
            RecipeRef::new(RecipeId(1), "Soup"),
            RecipeRef::new(RecipeId(2), "Soup"),
        ]
    );
    assert_eq!(
        session.resolve_ingredients(RecipeId(1)).expect("resolve"),
        Some(vec!["Salt".to_string()])
    );
}
