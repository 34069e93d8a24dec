//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState};
use crate::bootstrap::{self, SharedSession};
use crate::config::Config;
use crate::messages;
use larder_core::primitives::MAX_SNAPSHOT_SIZE;
use larder_core::{
    Catalog, CatalogEditor, CatalogStore, IngredientId, LarderError, RecipeDetail, RecipeId,
    RecipeRef, Session, catalog_from_bytes,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Bootstrap the session and start the HTTP server.
pub async fn cmd_serve(config: &Config, offline: bool) -> Result<(), LarderError> {
    let sync = bootstrap::synchronizer(config).await?;
    let session = bootstrap::open_session(&sync).await?;
    let revalidate = bootstrap::should_revalidate(config, offline, &session);

    println!("Larder Recipe Catalog Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:    {}:{}", config.http.host, config.http.port);
    println!("  Source:     {}", config.source.as_deref().unwrap_or("-"));
    println!("  Cache:      {}", config.cache_path.display());
    println!("  Snapshot:   {} ({})", session.fingerprint(), session.provenance());
    println!("  Detection:  {}", config.change_detection);
    println!();
    println!("Endpoints:");
    println!("  GET  /search?q=              - Recipes using an ingredient");
    println!("  GET  /recipes/{{id}}           - Recipe detail");
    println!("  GET  /recipes/{{id}}/ingredients");
    println!("  GET  /recipes/{{id}}/subrecipes");
    println!("  POST /query                  - Structured query");
    println!("  GET  /snapshot               - Raw snapshot");
    println!("  GET  /status, /health");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let shared: SharedSession = Arc::new(RwLock::new(session));
    if revalidate {
        bootstrap::spawn_revalidation(Arc::clone(&sync), Arc::clone(&shared));
    }

    api::run_server(AppState::from_shared(shared), &config.http).await
}

// =============================================================================
// ONE-SHOT QUERIES
// =============================================================================

/// Answer from the first session, then, if it came from the cache, wait for
/// revalidation and answer again when the snapshot changed.
async fn answer_with_refresh<F>(config: &Config, offline: bool, render: F) -> Result<(), LarderError>
where
    F: Fn(&Session) -> Result<(), LarderError>,
{
    let sync = bootstrap::synchronizer(config).await?;
    let session = bootstrap::open_session(&sync).await?;
    render(&session)?;

    if !bootstrap::should_revalidate(config, offline, &session) {
        return Ok(());
    }

    let shared = RwLock::new(session);
    match bootstrap::refresh(&sync, &shared).await {
        Ok(true) => {
            eprintln!("Catalog updated; refreshed answer:");
            render(&*shared.read().await)
        }
        Ok(false) => Ok(()),
        Err(e) => {
            tracing::warn!("Revalidated snapshot could not be opened: {}", e);
            Ok(())
        }
    }
}

/// Search recipes by ingredient.
pub async fn cmd_search(
    config: &Config,
    offline: bool,
    json_mode: bool,
    raw_term: &str,
) -> Result<(), LarderError> {
    let term = messages::normalize_search_term(raw_term)?;

    answer_with_refresh(config, offline, |session| {
        let recipes = session.search_by_ingredient(&term)?;
        print_search(&term, &recipes, json_mode);
        Ok(())
    })
    .await
}

fn print_search(term: &str, recipes: &[RecipeRef], json_mode: bool) {
    if json_mode {
        print_json(&serde_json::json!({
            "term": term,
            "message": messages::search_summary(recipes.len()),
            "recipes": recipes
                .iter()
                .map(|r| serde_json::json!({ "id": r.id.0, "name": r.name }))
                .collect::<Vec<_>>(),
        }));
        return;
    }

    println!("{}", messages::search_summary(recipes.len()));
    for r in recipes {
        println!("  [{}] {}", r.id, r.name);
    }
}

/// Show one recipe.
pub async fn cmd_show(
    config: &Config,
    offline: bool,
    json_mode: bool,
    id: u64,
) -> Result<(), LarderError> {
    answer_with_refresh(config, offline, |session| {
        let detail = session.resolve_detail(RecipeId(id))?;
        print_detail(detail.as_ref(), json_mode);
        Ok(())
    })
    .await
}

fn print_detail(detail: Option<&RecipeDetail>, json_mode: bool) {
    let Some(detail) = detail else {
        if json_mode {
            print_json(&serde_json::json!({ "found": false, "error": messages::RECIPE_NOT_FOUND }));
        } else {
            println!("{}", messages::RECIPE_NOT_FOUND);
        }
        return;
    };

    if json_mode {
        print_json(&serde_json::json!({
            "found": true,
            "id": detail.recipe.id.0,
            "name": detail.recipe.name,
            "ingredients": detail.ingredients,
            "subrecipes": detail
                .subrecipes
                .iter()
                .map(|r| serde_json::json!({ "id": r.id.0, "name": r.name }))
                .collect::<Vec<_>>(),
        }));
        return;
    }

    println!("{}", detail.recipe.name);
    println!("{}", "=".repeat(detail.recipe.name.chars().count()));
    println!();
    println!("Ingredients:");
    if detail.ingredients.is_empty() {
        println!("  (none)");
    }
    for name in &detail.ingredients {
        println!("  - {}", name);
    }
    println!();
    println!("Sub-recipes:");
    if detail.subrecipes.is_empty() {
        println!("  (none)");
    }
    for sub in &detail.subrecipes {
        println!("  [{}] {}", sub.id, sub.name);
    }
}

/// Show snapshot status.
pub async fn cmd_status(config: &Config, offline: bool, json_mode: bool) -> Result<(), LarderError> {
    answer_with_refresh(config, offline, |session| {
        let stats = session.stats()?;
        let fingerprint = session.fingerprint();

        if json_mode {
            print_json(&serde_json::json!({
                "source": config.source,
                "cache": config.cache_path.to_string_lossy(),
                "provenance": session.provenance().to_string(),
                "byte_len": fingerprint.byte_len,
                "digest": fingerprint.digest,
                "recipe_count": stats.recipes,
                "ingredient_count": stats.ingredients,
                "component_count": stats.components,
            }));
            return Ok(());
        }

        println!("Larder Snapshot Status");
        println!("======================");
        println!("Source:      {}", config.source.as_deref().unwrap_or("-"));
        println!("Cache:       {}", config.cache_path.display());
        println!("Loaded from: {}", session.provenance());
        println!("Snapshot:    {}", fingerprint);
        println!();
        println!("Recipes:     {}", stats.recipes);
        println!("Ingredients: {}", stats.ingredients);
        println!("Sub-recipe links: {}", stats.components);
        Ok(())
    })
    .await
}

// =============================================================================
// ADMIN: CATALOG FILE I/O
// =============================================================================

/// Read and decode a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog, LarderError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        LarderError::IoError(format!("Cannot read catalog '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_SNAPSHOT_SIZE as u64 {
        return Err(LarderError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        LarderError::IoError(format!("Cannot read catalog '{}': {}", path.display(), e))
    })?;
    catalog_from_bytes(&bytes)
}

/// Encode and write a catalog file.
///
/// Writes to a sibling temp file first so a failed write never truncates
/// the existing catalog.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), LarderError> {
    let bytes = CatalogEditor::export(catalog)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &bytes)
        .map_err(|e| LarderError::IoError(format!("Write '{}': {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| LarderError::IoError(format!("Replace '{}': {}", path.display(), e)))
}

/// Load, apply `edit`, save.
fn edit_catalog<T>(
    path: &Path,
    edit: impl FnOnce(&mut Catalog) -> Result<T, LarderError>,
) -> Result<T, LarderError> {
    let mut catalog = load_catalog(path)?;
    let out = edit(&mut catalog)?;
    save_catalog(path, &catalog)?;
    Ok(out)
}

// =============================================================================
// ADMIN COMMANDS
// =============================================================================

/// Create an empty catalog file.
pub fn cmd_init(path: &Path, force: bool) -> Result<(), LarderError> {
    if path.exists() && !force {
        return Err(LarderError::InvalidInput(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_catalog(path, &CatalogEditor::create_empty())?;
    println!("Initialized empty catalog at {}", path.display());
    Ok(())
}

/// Add a recipe.
pub fn cmd_add_recipe(path: &Path, name: &str, json_mode: bool) -> Result<(), LarderError> {
    let id = edit_catalog(path, |c| CatalogEditor::add_recipe(c, name))?;
    if json_mode {
        print_json(&serde_json::json!({ "recipe_id": id.0 }));
    } else {
        println!("Added recipe [{}] {}", id, name.trim());
    }
    Ok(())
}

/// Add an ingredient.
pub fn cmd_add_ingredient(path: &Path, name: &str, json_mode: bool) -> Result<(), LarderError> {
    let id = edit_catalog(path, |c| CatalogEditor::add_ingredient(c, name))?;
    if json_mode {
        print_json(&serde_json::json!({ "ingredient_id": id.0 }));
    } else {
        println!("Added ingredient [{}] {}", id, name.trim());
    }
    Ok(())
}

/// Link an ingredient to a recipe.
pub fn cmd_link_ingredient(path: &Path, recipe: u64, ingredient: u64) -> Result<(), LarderError> {
    edit_catalog(path, |c| {
        CatalogEditor::link_ingredient(c, RecipeId(recipe), IngredientId(ingredient))
    })?;
    println!("Linked ingredient {} to recipe {}", ingredient, recipe);
    Ok(())
}

/// Make `child` a sub-recipe of `parent`.
pub fn cmd_link_subrecipe(path: &Path, parent: u64, child: u64) -> Result<(), LarderError> {
    edit_catalog(path, |c| {
        CatalogEditor::link_subrecipe(c, RecipeId(parent), RecipeId(child))
    })?;
    println!("Linked recipe {} as a sub-recipe of {}", child, parent);
    Ok(())
}

/// List everything in a catalog file.
pub fn cmd_list(path: &Path, json_mode: bool) -> Result<(), LarderError> {
    let catalog = load_catalog(path)?;
    let mut recipes: Vec<RecipeRef> = catalog.recipes().map(RecipeRef::from).collect();
    recipes.sort();
    let mut ingredients = catalog.ingredients()?;
    ingredients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    let uses = CatalogEditor::ingredient_links(&catalog)?;
    let components = CatalogEditor::component_links(&catalog)?;

    if json_mode {
        let links = |rows: &[larder_core::LinkRow]| {
            rows.iter()
                .map(|l| serde_json::json!({ "from": l.from, "to": l.to }))
                .collect::<Vec<_>>()
        };
        print_json(&serde_json::json!({
            "recipes": recipes
                .iter()
                .map(|r| serde_json::json!({ "id": r.id.0, "name": r.name }))
                .collect::<Vec<_>>(),
            "ingredients": ingredients
                .iter()
                .map(|i| serde_json::json!({ "id": i.id.0, "name": i.name }))
                .collect::<Vec<_>>(),
            "recipe_ingredients": links(&uses),
            "recipe_components": links(&components),
        }));
        return Ok(());
    }

    println!("Recipes:");
    for r in &recipes {
        println!("  [{}] {}", r.id, r.name);
    }
    println!();
    println!("Ingredients:");
    for i in &ingredients {
        println!("  [{}] {}", i.id, i.name);
    }
    println!();
    println!("Recipe ingredients:");
    for l in &uses {
        println!("  {} -> {}", l.from, l.to);
    }
    println!();
    println!("Sub-recipes:");
    for l in &components {
        println!("  {} -> {}", l.from, l.to);
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
