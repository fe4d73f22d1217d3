//! DTOs for decoding upstream user and post JSON.
//!
//! Decoding is lenient: scalar fields that are missing or `null` fall back to
//! their defaults and nested objects are optional. Mapping into domain
//! records happens in one pass after decoding.

use serde::{Deserialize, Deserializer};

use crate::domain::{Address, Company, Geo, Post, UserProfile};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct UserDto {
    #[serde(deserialize_with = "null_as_default")]
    pub(super) id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) email: String,
    pub(super) address: Option<AddressDto>,
    pub(super) phone: Option<String>,
    pub(super) website: Option<String>,
    pub(super) company: Option<CompanyDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct AddressDto {
    #[serde(deserialize_with = "null_as_default")]
    pub(super) street: String,
    pub(super) suite: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) zipcode: String,
    pub(super) geo: Option<GeoDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct GeoDto {
    #[serde(deserialize_with = "null_as_default")]
    pub(super) lat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) lng: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct CompanyDto {
    #[serde(deserialize_with = "null_as_default")]
    pub(super) name: String,
    pub(super) catch_phrase: Option<String>,
    pub(super) bs: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct PostDto {
    #[serde(deserialize_with = "null_as_default")]
    pub(super) user_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(super) body: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<UserDto> for UserProfile {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            username: dto.username,
            email: dto.email,
            address: dto.address.map(Address::from),
            phone: dto.phone,
            website: dto.website,
            company: dto.company.map(Company::from),
        }
    }
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Self {
            street: dto.street,
            suite: dto.suite,
            city: dto.city,
            zipcode: dto.zipcode,
            geo: dto.geo.map(|geo| Geo {
                lat: geo.lat,
                lng: geo.lng,
            }),
        }
    }
}

impl From<CompanyDto> for Company {
    fn from(dto: CompanyDto) -> Self {
        Self {
            name: dto.name,
            catch_phrase: dto.catch_phrase,
            bs: dto.bs,
        }
    }
}

impl From<PostDto> for Post {
    fn from(dto: PostDto) -> Self {
        Self {
            user_id: dto.user_id,
            id: dto.id,
            title: dto.title,
            body: dto.body,
        }
    }
}
