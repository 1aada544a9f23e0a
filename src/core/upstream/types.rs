use serde::{Deserialize, Deserializer};

/// Missing and `null` fields both decode to the type's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Brand {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Outlet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// One clearance listing as returned by the postings API.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Posting {
    #[serde(rename = "posting_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "posting_text", default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(rename = "name", default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(rename = "pim_id", default, deserialize_with = "null_as_default")]
    pub product_id: i64,
    #[serde(
        rename = "top_level_catalog_id",
        default,
        deserialize_with = "null_as_default"
    )]
    pub category_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shipping_cost: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: Brand,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outlet: Outlet,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PostingsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub postings: Vec<Posting>,
    #[serde(
        rename = "morePostingsAvailable",
        default,
        deserialize_with = "null_as_default"
    )]
    pub has_more: bool,
}

/// Filter criteria for one feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingFilter {
    pub brands: Vec<String>,
    pub category_ids: Vec<String>,
    pub outlet_ids: Vec<String>,
    pub keyword: Option<String>,
}

impl PostingFilter {
    pub fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_postings_decode_as_empty_page() {
        let page: PostingsPage =
            serde_json::from_str(r#"{"postings": null, "morePostingsAvailable": null}"#)
                .expect("null page fields should decode");
        assert!(page.postings.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn null_posting_fields_fall_back_to_zero_values() {
        let body = r#"{
            "postings": [{
                "posting_id": "p1",
                "posting_text": null,
                "name": "ProductX",
                "pim_id": null,
                "top_level_catalog_id": null,
                "price": "19.99",
                "shipping_cost": null,
                "brand": null,
                "outlet": {"id": 418, "name": null}
            }],
            "morePostingsAvailable": false
        }"#;

        let page: PostingsPage = serde_json::from_str(body).expect("nulls should decode");

        let posting = &page.postings[0];
        assert_eq!(posting.id, "p1");
        assert_eq!(posting.text, "");
        assert_eq!(posting.product_id, 0);
        assert_eq!(posting.category_id, "");
        assert_eq!(posting.shipping_cost, 0.0);
        assert_eq!(posting.brand, Brand::default());
        assert_eq!(posting.outlet.id, 418);
        assert_eq!(posting.outlet.name, "");
    }
}
