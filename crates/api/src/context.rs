use launchdesk_auth::ShopSession;

/// Shop context for an authenticated admin request.
///
/// Inserted by the auth middleware; present on every admin route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopContext {
    shop: String,
    user_id: Option<String>,
}

impl ShopContext {
    pub fn new(shop: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            shop: shop.into(),
            user_id,
        }
    }

    pub fn shop(&self) -> &str {
        &self.shop
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl From<ShopSession> for ShopContext {
    fn from(session: ShopSession) -> Self {
        Self::new(session.shop, session.user_id)
    }
}
