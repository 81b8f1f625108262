/// Users
/// Manage user accounts.
#[rest_controller]
#[request_mapping("/users")]
impl UserController {
    /// List users
    /// Pages through all users.
    /// @param page zero-based page index
    #[get_mapping]
    pub async fn list(
        &self,
        #[request_param(default_value = "0")] page: u32,
        #[request_param(default_value = "20")] size: u32,
    ) -> Json<Vec<User>> {
        todo!()
    }

    /// Get user
    /// @param id user identifier
    #[get_mapping(value = ["/{id}", "/by-id/{id}"])]
    pub async fn get(&self, #[path_variable] id: u64) -> Json<User> {
        todo!()
    }

    /// Create user
    /// @param X-Request-Id correlation id
    #[post_mapping]
    pub async fn create(
        &self,
        #[request_body] user: CreateUser,
        #[request_header("X-Request-Id")] request_id: String,
    ) -> Json<User> {
        todo!()
    }

    /// Rename user
    #[put_mapping("/{id}/name")]
    pub async fn rename(&self, #[path_variable] id: u64, name: String, note: Option<String>) {}

    /// Merge users
    #[put_mapping("/{a}/{b}")]
    pub async fn merge(&self, #[path_variable] Path((a, b)): Path<(u64, u64)>) {}

    /// Delete user
    /// @ignore
    #[delete_mapping("/{id}")]
    pub async fn delete(&self, #[path_variable] id: u64) {}

    /// Not an endpoint
    pub fn helper(&self) -> u32 {
        0
    }
}

/// Orders
/// @book admin
#[rest_controller]
#[request_mapping("/admin/orders")]
impl OrderController {
    /// Search orders
    #[get_mapping("/search")]
    pub async fn search(&self, pageable: Pageable, req: HttpRequest) -> Page<Order> {
        todo!()
    }

    /// Export orders
    #[get_mapping("/export")]
    #[response_type("List<Order>")]
    pub async fn export(&self) -> HttpResponse {
        todo!()
    }
}
