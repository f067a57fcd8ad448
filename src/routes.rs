use actix_web::{delete, get, post, web, HttpResponse};

use crate::balance::aggregate;
use crate::error::AppError;
use crate::schemas::{NewExpense, NewUser, Summary};
use crate::settlement::minimize_settlements;
use crate::splits::check_user;
use crate::store::Store;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(add_user)
        .service(list_expenses)
        .service(add_expense)
        .service(delete_expense)
        .service(get_balances)
        .service(get_settlements)
        .service(get_summary);
}

#[get("/users")]
async fn list_users(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.list_users().await?))
}

#[post("/users")]
async fn add_user(
    store: web::Data<Store>,
    json: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
    let new_user = json.into_inner();
    check_user(&new_user)?;
    let user = store.add_user(new_user).await?;
    tracing::info!("added user {} ({})", user.name, user.id);
    Ok(HttpResponse::Created().json(user))
}

#[get("/expenses")]
async fn list_expenses(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.list_expenses().await?))
}

#[post("/expenses")]
async fn add_expense(
    store: web::Data<Store>,
    json: web::Json<NewExpense>,
) -> Result<HttpResponse, AppError> {
    let expense = store.add_expense(json.into_inner()).await?;
    tracing::info!(
        "added expense {} of {} paid by {} split {} ways",
        expense.expense.id,
        expense.expense.amount,
        expense.payer.name,
        expense.splits.len()
    );
    Ok(HttpResponse::Created().json(expense))
}

#[delete("/expenses/{id}")]
async fn delete_expense(
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    store.delete_expense(&id).await?;
    tracing::info!("deleted expense {id}");
    Ok(HttpResponse::NoContent().finish())
}

#[get("/balances")]
async fn get_balances(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let expenses = store.list_expenses().await?;
    Ok(HttpResponse::Ok().json(aggregate(&expenses)))
}

#[get("/settlements")]
async fn get_settlements(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let expenses = store.list_expenses().await?;
    Ok(HttpResponse::Ok().json(minimize_settlements(&aggregate(&expenses))))
}

#[get("/summary")]
async fn get_summary(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let expenses = store.list_expenses().await?;
    let balances = aggregate(&expenses);
    let settlements = minimize_settlements(&balances);
    tracing::debug!(
        "{} expenses give {} balances and {} settlements",
        expenses.len(),
        balances.len(),
        settlements.len()
    );
    Ok(HttpResponse::Ok().json(Summary {
        balances,
        settlements,
    }))
}
