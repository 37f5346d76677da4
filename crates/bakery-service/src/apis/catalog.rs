//! Public catalog endpoints.

use super::failed;
use bakery_core::BakeryEngine;
use bakery_types::{APIError, Cake, CakeId, CustomizationOption};

/// Handles GET /api/cakes.
pub async fn list_cakes(engine: &BakeryEngine) -> Result<Vec<Cake>, APIError> {
	engine
		.catalog_service()
		.list_cakes()
		.await
		.map_err(|e| failed("Cake listing", e))
}

/// Handles GET /api/cakes/{id}.
pub async fn get_cake(engine: &BakeryEngine, id: CakeId) -> Result<Cake, APIError> {
	engine
		.catalog_service()
		.get_cake(id)
		.await
		.map_err(|e| failed("Cake retrieval", e))
}

/// Handles GET /api/customizations.
pub async fn list_customizations(
	engine: &BakeryEngine,
) -> Result<Vec<CustomizationOption>, APIError> {
	engine
		.catalog_service()
		.list_customizations()
		.await
		.map_err(|e| failed("Customization listing", e))
}
