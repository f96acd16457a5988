//! GraphQL Admin API client.
//!
//! All values travel as GraphQL variables; nothing is spliced into query text.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};

use launchdesk_comments::CustomerProfile;
use launchdesk_core::ProductGid;
use launchdesk_products::{CatalogProduct, ProductImage};

use super::{CatalogGateway, GatewayError, MetafieldInput, UserError};
use crate::config::ShopifyConfig;

const PRODUCT_TAGS_QUERY: &str = r#"
query ProductTags($id: ID!) {
  product(id: $id) {
    tags
  }
}
"#;

const UPDATE_TAGS_MUTATION: &str = r#"
mutation UpdateProductTags($input: ProductInput!) {
  productUpdate(input: $input) {
    product { id }
    userErrors { field message }
  }
}
"#;

const SET_METAFIELDS_MUTATION: &str = r#"
mutation SetMetafields($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields { id }
    userErrors { field message }
  }
}
"#;

const LIST_PRODUCTS_QUERY: &str = r#"
query ListProducts($first: Int!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        tags
        totalInventory
        featuredImage { url altText }
        metafields(first: 10, namespace: "custom") {
          edges { node { key value } }
        }
      }
    }
  }
}
"#;

const PRODUCT_TITLES_QUERY: &str = r#"
query ProductTitles($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on Product { id title }
  }
}
"#;

const SEARCH_CUSTOMERS_QUERY: &str = r#"
query SearchCustomers($query: String!) {
  customers(first: 100, query: $query) {
    edges { node { id firstName lastName email } }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct ProductTagsData {
    product: Option<TagsNode>,
}

#[derive(Debug, Deserialize)]
struct TagsNode {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductUpdateData {
    product_update: Option<MutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetafieldsSetData {
    metafields_set: Option<MutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationPayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    id: String,
    title: String,
    #[serde(default)]
    tags: Vec<String>,
    total_inventory: Option<i64>,
    featured_image: Option<ImageNode>,
    metafields: Connection<MetafieldNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageNode {
    url: String,
    alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetafieldNode {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct NodesData {
    nodes: Vec<Option<TitleNode>>,
}

#[derive(Debug, Deserialize)]
struct TitleNode {
    id: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomersData {
    customers: Connection<CustomerNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerNode {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl TryFrom<ProductNode> for CatalogProduct {
    type Error = GatewayError;

    fn try_from(node: ProductNode) -> Result<Self, Self::Error> {
        let id = ProductGid::new(node.id).map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(CatalogProduct {
            id,
            title: node.title,
            tags: node.tags,
            total_inventory: node.total_inventory,
            featured_image: node.featured_image.map(|img| ProductImage {
                url: img.url,
                alt_text: img.alt_text,
            }),
            metafields: node
                .metafields
                .edges
                .into_iter()
                .map(|e| (e.node.key, e.node.value))
                .collect::<BTreeMap<_, _>>(),
        })
    }
}

fn ensure_no_user_errors(payload: Option<MutationPayload>, op: &str) -> Result<(), GatewayError> {
    let payload = payload.ok_or_else(|| GatewayError::Decode(format!("{op}: missing payload")))?;
    if payload.user_errors.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::UserErrors(payload.user_errors))
    }
}

/// Catalog gateway backed by the GraphQL Admin API.
#[derive(Debug, Clone)]
pub struct ShopifyAdminGateway {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl ShopifyAdminGateway {
    pub fn new(config: &ShopifyConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self::with_client(
            http,
            config.graphql_endpoint(),
            config.access_token.clone(),
        ))
    }

    pub fn with_client(http: reqwest::Client, endpoint: String, access_token: String) -> Self {
        Self {
            http,
            endpoint,
            access_token,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: JsonValue,
    ) -> Result<T, GatewayError> {
        tracing::debug!(operation, "catalog request");

        let resp = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status.as_u16(), "catalog request failed");
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: GraphqlResponse<T> = resp
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("{operation}: {e}")))?;

        if !body.errors.is_empty() {
            let message = body
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!(operation, %message, "catalog request rejected");
            return Err(GatewayError::Graphql(message));
        }

        body.data
            .ok_or_else(|| GatewayError::Decode(format!("{operation}: response has no data")))
    }
}

#[async_trait::async_trait]
impl CatalogGateway for ShopifyAdminGateway {
    #[tracing::instrument(skip(self), fields(product_id = %id))]
    async fn product_tags(&self, id: &ProductGid) -> Result<Vec<String>, GatewayError> {
        let data: ProductTagsData = self
            .execute("ProductTags", PRODUCT_TAGS_QUERY, json!({ "id": id }))
            .await?;
        data.product
            .map(|p| p.tags)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    #[tracing::instrument(skip(self, tags), fields(product_id = %id, tag_count = tags.len()))]
    async fn update_product_tags(
        &self,
        id: &ProductGid,
        tags: &[String],
    ) -> Result<(), GatewayError> {
        let data: ProductUpdateData = self
            .execute(
                "UpdateProductTags",
                UPDATE_TAGS_MUTATION,
                json!({ "input": { "id": id, "tags": tags } }),
            )
            .await?;
        ensure_no_user_errors(data.product_update, "productUpdate")
    }

    #[tracing::instrument(skip(self, input), fields(product_id = %input.owner_id, key = %input.key))]
    async fn set_metafield(&self, input: &MetafieldInput) -> Result<(), GatewayError> {
        let data: MetafieldsSetData = self
            .execute(
                "SetMetafields",
                SET_METAFIELDS_MUTATION,
                json!({ "metafields": [input] }),
            )
            .await?;
        ensure_no_user_errors(data.metafields_set, "metafieldsSet")
    }

    async fn list_products(&self, first: usize) -> Result<Vec<CatalogProduct>, GatewayError> {
        let data: ProductsData = self
            .execute("ListProducts", LIST_PRODUCTS_QUERY, json!({ "first": first }))
            .await?;
        data.products
            .edges
            .into_iter()
            .map(|e| CatalogProduct::try_from(e.node))
            .collect()
    }

    async fn product_titles(
        &self,
        ids: &[ProductGid],
    ) -> Result<HashMap<ProductGid, String>, GatewayError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let data: NodesData = self
            .execute("ProductTitles", PRODUCT_TITLES_QUERY, json!({ "ids": ids }))
            .await?;
        Ok(data
            .nodes
            .into_iter()
            .flatten()
            .filter_map(|n| match (n.id, n.title) {
                (Some(id), Some(title)) => ProductGid::new(id).ok().map(|id| (id, title)),
                _ => None,
            })
            .collect())
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<CustomerProfile>, GatewayError> {
        let data: CustomersData = self
            .execute("SearchCustomers", SEARCH_CUSTOMERS_QUERY, json!({ "query": query }))
            .await?;
        Ok(data
            .customers
            .edges
            .into_iter()
            .filter_map(|e| {
                let node = e.node;
                node.email.map(|email| CustomerProfile {
                    first_name: node.first_name,
                    last_name: node.last_name,
                    email,
                })
            })
            .collect())
    }
}
