//! Premium endpoints: per-category statistics and CSV export.

use api_types::{DataResponse, expense::ExpenseQuery, stats::CategoryStat};
use auth::RequestContext;
use axum::{
    Extension, Json,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use csv::Writer;

use crate::{ServerError, expenses::map_filter, extract::QueryParams, server::ServerState};

/// Handle requests for per-category totals
pub async fn get_stats(
    Extension(context): Extension<RequestContext>,
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ExpenseQuery>,
) -> Result<Json<DataResponse<Vec<CategoryStat>>>, ServerError> {
    let stats = state
        .engine
        .expense_stats(context.user_id, &map_filter(&query))
        .await?
        .into_iter()
        .map(|total| CategoryStat {
            category: total.category.to_string(),
            total: total.total,
        })
        .collect();

    Ok(Json(DataResponse::new(stats)))
}

/// Download the caller's expenses as `expenses.csv`
pub async fn export_csv(
    Extension(context): Extension<RequestContext>,
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<ExpenseQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let expenses = state
        .engine
        .list_expenses(context.user_id, &map_filter(&query))
        .await?;

    let mut writer = Writer::from_writer(vec![]);
    writer
        .write_record(["ID", "Date", "Category", "Title", "Amount"])
        .map_err(|err| ServerError::Internal(format!("failed to write CSV header: {err}")))?;
    for expense in expenses {
        writer
            .write_record([
                expense.id.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.category.to_string(),
                expense.title,
                format!("{:.2}", expense.amount),
            ])
            .map_err(|err| ServerError::Internal(format!("failed to write CSV row: {err}")))?;
    }
    let data = writer
        .into_inner()
        .map_err(|err| ServerError::Internal(format!("failed to finalize export: {err}")))?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv"),
            (CONTENT_DISPOSITION, "attachment;filename=expenses.csv"),
        ],
        data,
    ))
}
