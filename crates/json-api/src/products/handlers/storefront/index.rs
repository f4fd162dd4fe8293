//! Storefront Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use storefront_app::domain::products::models::ProductFilter;

use crate::{extensions::*, products::index::ProductsResponse, state::State};

/// Storefront Product Index Handler
///
/// Returns active, available products, newest first.
#[endpoint(tags("storefront"), summary = "Browse Products")]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    featured: QueryParam<bool, false>,
    q: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = ProductFilter {
        category_slug: category.into_inner(),
        featured: featured.into_inner(),
        search: q.into_inner(),
    };

    let products = state
        .app
        .products
        .list_storefront_products(filter)
        .await
        .or_500("failed to fetch storefront products")?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::products::{MockProductsService, models::ProductUuid};

    use crate::test_helpers::{make_product, mock_app, public_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        let mut app = mock_app();

        app.products = Arc::new(products);

        public_service(app, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_browse_without_filters() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_list_storefront_products()
            .once()
            .withf(|filter| *filter == ProductFilter::default())
            .return_once(move |_| Ok(vec![make_product(uuid)]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await
            .take_json()
            .await?;

        assert_eq!(response.products.len(), 1, "expected one product");
        assert_eq!(response.products[0].uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_browse_forwards_filters() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_storefront_products()
            .once()
            .withf(|filter| {
                *filter
                    == ProductFilter {
                        category_slug: Some("mugs".to_string()),
                        featured: Some(true),
                        search: Some("blue".to_string()),
                    }
            })
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/products?category=mugs&featured=true&q=blue")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
