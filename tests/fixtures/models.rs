/// A registered user
pub struct User {
    /// user identifier
    pub id: u64,
    /// display name
    pub name: String,
    pub age: Option<u32>,
    pub address: Address,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
}

pub struct Address {
    pub city: String,
    pub zip: String,
}

pub enum Role {
    Admin,
    Member,
}

pub struct CreateUser {
    /// display name
    pub name: String,
    #[default_value("18")]
    pub age: u32,
    /// stored elsewhere
    pub avatar: Blob,
}

pub struct Order {
    pub id: u64,
    pub total: f64,
    pub parent: Option<Box<Order>>,
}
