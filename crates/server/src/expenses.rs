//! Expenses API endpoints

use api_types::{
    DataResponse,
    expense::{ExpenseNew, ExpenseQuery, ExpenseUpdate, ExpenseView},
};
use auth::RequestContext;
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use engine::{CreateExpenseCmd, ExpenseFilter, UpdateExpenseCmd};

use crate::{
    ServerError,
    extract::{JsonBody, PathParam, QueryParams},
    server::ServerState,
};

pub(crate) fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        user_id: expense.user_id,
        title: expense.title,
        amount: expense.amount,
        category: expense.category.to_string(),
        date: expense.date.fixed_offset(),
        created_at: expense.created_at.fixed_offset(),
        updated_at: expense.updated_at.fixed_offset(),
    }
}

pub(crate) fn map_filter(query: &ExpenseQuery) -> ExpenseFilter {
    ExpenseFilter::new(
        query.filter.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    )
}

pub async fn create(
    Extension(context): Extension<RequestContext>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ExpenseNew>,
) -> Result<(StatusCode, Json<DataResponse<ExpenseView>>), ServerError> {
    let mut cmd = CreateExpenseCmd::new(payload.title, payload.amount, payload.category);
    if let Some(date) = payload.date {
        cmd = cmd.date(date.with_timezone(&Utc));
    }

    let expense = state.engine.create_expense(context.user_id, cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(map_expense(expense))),
    ))
}

pub async fn list(
    Extension(context): Extension<RequestContext>,
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ExpenseQuery>,
) -> Result<Json<DataResponse<Vec<ExpenseView>>>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(context.user_id, &map_filter(&query))
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(DataResponse::new(expenses)))
}

pub async fn update(
    Extension(context): Extension<RequestContext>,
    State(state): State<ServerState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<ExpenseUpdate>,
) -> Result<Json<DataResponse<ExpenseView>>, ServerError> {
    let cmd = UpdateExpenseCmd {
        title: payload.title,
        amount: payload.amount,
        category: payload.category,
        date: payload.date.map(|date| date.with_timezone(&Utc)),
    };

    let expense = state
        .engine
        .update_expense(context.user_id, id, cmd)
        .await?;
    Ok(Json(DataResponse::new(map_expense(expense))))
}

pub async fn delete(
    Extension(context): Extension<RequestContext>,
    State(state): State<ServerState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<DataResponse<&'static str>>, ServerError> {
    state.engine.delete_expense(context.user_id, id).await?;
    Ok(Json(DataResponse::new("Expense deleted")))
}
