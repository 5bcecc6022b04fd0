use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::recipe;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/recipes", recipe_routes())
}

fn recipe_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(recipe::list_recipes, recipe::create_recipe))
        .routes(routes!(recipe::list_recipes_by_app))
        .routes(routes!(recipe::most_liked_recipe))
        .routes(routes!(recipe::most_commented_recipe))
        .routes(routes!(recipe::highest_rated_recipe))
        .routes(routes!(
            recipe::get_recipe,
            recipe::update_recipe,
            recipe::delete_recipe
        ))
}
