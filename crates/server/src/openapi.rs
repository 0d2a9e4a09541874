use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthDoc { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct EmployeeDoc {
    pub id: u64,
    pub name: String,
    pub role: String,
    pub salary: f64,
}

#[derive(ToSchema)]
pub struct NewEmployeeDoc {
    pub name: String,
    pub role: String,
    pub salary: f64,
}

#[derive(ToSchema)]
pub struct EmployeePatchDoc {
    pub name: Option<String>,
    pub role: Option<String>,
    pub salary: Option<f64>,
}

#[derive(ToSchema)]
pub struct RemovedDoc { pub removed: EmployeeDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::employees::list,
        crate::routes::employees::create,
        crate::routes::employees::update,
        crate::routes::employees::delete,
    ),
    components(
        schemas(
            HealthDoc,
            ErrorDoc,
            EmployeeDoc,
            NewEmployeeDoc,
            EmployeePatchDoc,
            RemovedDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "employees")
    )
)]
pub struct ApiDoc;
