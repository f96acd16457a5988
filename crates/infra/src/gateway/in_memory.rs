//! In-memory catalog for tests/dev.
//!
//! Records every call in order and can be told to fail the next call of a
//! given kind, so partial-failure paths can be exercised deterministically.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use launchdesk_comments::{CustomerProfile, normalize_email};
use launchdesk_core::ProductGid;
use launchdesk_products::CatalogProduct;

use super::{CatalogGateway, GatewayError, MetafieldInput, UserError};

/// Kind of gateway call, used for fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    ProductTags,
    UpdateProductTags,
    SetMetafield,
    ListProducts,
    ProductTitles,
    SearchCustomers,
}

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ProductTags(ProductGid),
    UpdateProductTags { id: ProductGid, tags: Vec<String> },
    SetMetafield(MetafieldInput),
    ListProducts { first: usize },
    ProductTitles(Vec<ProductGid>),
    SearchCustomers(String),
}

impl GatewayCall {
    pub fn operation(&self) -> GatewayOperation {
        match self {
            GatewayCall::ProductTags(_) => GatewayOperation::ProductTags,
            GatewayCall::UpdateProductTags { .. } => GatewayOperation::UpdateProductTags,
            GatewayCall::SetMetafield(_) => GatewayOperation::SetMetafield,
            GatewayCall::ListProducts { .. } => GatewayOperation::ListProducts,
            GatewayCall::ProductTitles(_) => GatewayOperation::ProductTitles,
            GatewayCall::SearchCustomers(_) => GatewayOperation::SearchCustomers,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            GatewayCall::UpdateProductTags { .. } | GatewayCall::SetMetafield(_)
        )
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<CatalogProduct>,
    customers: Vec<CustomerProfile>,
    calls: Vec<GatewayCall>,
    faults: HashMap<GatewayOperation, GatewayError>,
}

impl CatalogState {
    fn record(&mut self, call: GatewayCall) -> Result<(), GatewayError> {
        let op = call.operation();
        self.calls.push(call);
        match self.faults.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn product_mut(&mut self, id: &ProductGid) -> Option<&mut CatalogProduct> {
        self.products.iter_mut().find(|p| &p.id == id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<CatalogProduct>) -> Self {
        let catalog = Self::new();
        catalog.state().products = products;
        catalog
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace a product.
    pub fn upsert_product(&self, product: CatalogProduct) {
        let mut state = self.state();
        match state.product_mut(&product.id) {
            Some(existing) => *existing = product,
            None => state.products.push(product),
        }
    }

    pub fn add_customer(&self, customer: CustomerProfile) {
        self.state().customers.push(customer);
    }

    pub fn product(&self, id: &ProductGid) -> Option<CatalogProduct> {
        self.state().products.iter().find(|p| &p.id == id).cloned()
    }

    /// Fail the next call of `op` with `err` (one-shot).
    pub fn fail_next(&self, op: GatewayOperation, err: GatewayError) {
        self.state().faults.insert(op, err);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<GatewayCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }
}

fn missing_product(id: &ProductGid) -> GatewayError {
    GatewayError::UserErrors(vec![UserError {
        field: Some(vec!["id".to_string()]),
        message: format!("Product {id} does not exist"),
    }])
}

/// Extract `email:<addr>` terms from a customer search query.
fn query_emails(query: &str) -> Vec<String> {
    query
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter_map(|term| term.strip_prefix("email:"))
        .map(normalize_email)
        .collect()
}

#[async_trait::async_trait]
impl CatalogGateway for InMemoryCatalog {
    async fn product_tags(&self, id: &ProductGid) -> Result<Vec<String>, GatewayError> {
        let mut state = self.state();
        state.record(GatewayCall::ProductTags(id.clone()))?;
        state
            .products
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.tags.clone())
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn update_product_tags(
        &self,
        id: &ProductGid,
        tags: &[String],
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.record(GatewayCall::UpdateProductTags {
            id: id.clone(),
            tags: tags.to_vec(),
        })?;
        let product = state.product_mut(id).ok_or_else(|| missing_product(id))?;
        product.tags = tags.to_vec();
        Ok(())
    }

    async fn set_metafield(&self, input: &MetafieldInput) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.record(GatewayCall::SetMetafield(input.clone()))?;
        let product = state
            .product_mut(&input.owner_id)
            .ok_or_else(|| missing_product(&input.owner_id))?;
        product
            .metafields
            .insert(input.key.clone(), input.value.clone());
        Ok(())
    }

    async fn list_products(&self, first: usize) -> Result<Vec<CatalogProduct>, GatewayError> {
        let mut state = self.state();
        state.record(GatewayCall::ListProducts { first })?;
        Ok(state.products.iter().take(first).cloned().collect())
    }

    async fn product_titles(
        &self,
        ids: &[ProductGid],
    ) -> Result<HashMap<ProductGid, String>, GatewayError> {
        let mut state = self.state();
        state.record(GatewayCall::ProductTitles(ids.to_vec()))?;
        Ok(state
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| (p.id.clone(), p.title.clone()))
            .collect())
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<CustomerProfile>, GatewayError> {
        let mut state = self.state();
        state.record(GatewayCall::SearchCustomers(query.to_string()))?;
        let wanted = query_emails(query);
        Ok(state
            .customers
            .iter()
            .filter(|c| wanted.contains(&normalize_email(&c.email)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn product(id: &str, tags: &[&str]) -> CatalogProduct {
        CatalogProduct {
            id: ProductGid::new(id).unwrap(),
            title: format!("Product {id}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            total_inventory: None,
            featured_image: None,
            metafields: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn records_calls_and_applies_writes() {
        let catalog = InMemoryCatalog::with_products(vec![product("P1", &["coming-soon"])]);
        let id = ProductGid::new("P1").unwrap();

        assert_eq!(catalog.product_tags(&id).await.unwrap(), vec!["coming-soon"]);
        catalog
            .update_product_tags(&id, &["pre-order".to_string()])
            .await
            .unwrap();

        assert_eq!(catalog.product(&id).unwrap().tags, vec!["pre-order"]);
        assert_eq!(catalog.calls().len(), 2);
        assert_eq!(catalog.write_calls().len(), 1);
    }

    #[tokio::test]
    async fn injected_fault_fires_once() {
        let catalog = InMemoryCatalog::with_products(vec![product("P1", &[])]);
        let id = ProductGid::new("P1").unwrap();
        catalog.fail_next(
            GatewayOperation::ProductTags,
            GatewayError::Transport("connection reset".into()),
        );

        assert!(matches!(
            catalog.product_tags(&id).await,
            Err(GatewayError::Transport(_))
        ));
        assert!(catalog.product_tags(&id).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_products_are_reported() {
        let catalog = InMemoryCatalog::new();
        let id = ProductGid::new("nope").unwrap();
        assert!(matches!(
            catalog.product_tags(&id).await,
            Err(GatewayError::NotFound(_))
        ));
        assert!(matches!(
            catalog.update_product_tags(&id, &[]).await,
            Err(GatewayError::UserErrors(_))
        ));
    }

    #[tokio::test]
    async fn customer_search_matches_normalised_emails() {
        let catalog = InMemoryCatalog::new();
        catalog.add_customer(CustomerProfile {
            first_name: Some("Ada".into()),
            last_name: None,
            email: "Ada@Example.com".into(),
        });
        let found = catalog
            .search_customers("(email:ada@example.com OR email:bob@example.com)")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
