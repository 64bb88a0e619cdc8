use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{CartItemRelation, CartItemView},
    validate::{MIN_COUNT, ValidationError, Validator},
};

/// Body shared by add and update. Missing fields decode as zero and are
/// rejected by [`CartItemRequest::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub count: i32,
}

impl CartItemRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .not_empty("itemId", self.item_id)
            .not_empty("userId", self.user_id)
            .greater_than("count", self.count.into(), MIN_COUNT)
            .finish()
    }

    pub fn relation(&self) -> CartItemRelation {
        CartItemRelation {
            item_id: self.item_id,
            user_id: self.user_id,
            count: self.count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub cart_item: CartItemView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_items: Vec<CartItemView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(item_id: i64, user_id: i64, count: i32) -> CartItemRequest {
        CartItemRequest {
            item_id,
            user_id,
            count,
        }
    }

    #[test]
    fn fields_are_checked_in_order() {
        assert_eq!(request(0, 0, 0).validate().unwrap_err().field(), "itemId");
        assert_eq!(request(1, 0, 0).validate().unwrap_err().field(), "userId");
        assert_eq!(request(1, 1, 0).validate().unwrap_err().field(), "count");
        assert_eq!(request(1, 1, -3).validate().unwrap_err().field(), "count");
        assert!(request(1, 1, 1).validate().is_ok());
    }

    #[test]
    fn missing_fields_decode_as_zero() {
        let req: CartItemRequest = serde_json::from_str(r#"{"itemId": 4}"#).unwrap();
        assert_eq!(req.item_id, 4);
        assert_eq!(req.validate().unwrap_err().field(), "userId");
    }
}
