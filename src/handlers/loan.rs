use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::loan::{
    CreateLoanRequest, ListLoansQuery, Loan, LoanId, LoanService, PaginatedResponse,
    PaymentRequest,
};

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub async fn list_loans(
    State(service): State<Arc<LoanService>>,
    query: Result<Query<ListLoansQuery>, QueryRejection>,
) -> ApiResult<Json<PaginatedResponse<Loan>>> {
    let Query(query) = query?;

    let page = service
        .list_loans(
            query.page_number.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(Json(page))
}

pub async fn get_loan(
    State(service): State<Arc<LoanService>>,
    id: Result<Path<LoanId>, PathRejection>,
) -> ApiResult<Json<Loan>> {
    let Path(id) = id?;

    service
        .get_loan(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::loan_not_found)
}

pub async fn create_loan(
    State(service): State<Arc<LoanService>>,
    request: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = request?;

    let loan = service
        .create_loan(request.amount, &request.applicant_name)
        .await?;

    let location = format!("/loan/{}", loan.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(loan)))
}

pub async fn make_payment(
    State(service): State<Arc<LoanService>>,
    id: Result<Path<LoanId>, PathRejection>,
    request: Result<Json<PaymentRequest>, JsonRejection>,
) -> ApiResult<Json<Loan>> {
    let Path(id) = id?;
    let Json(request) = request?;

    service
        .make_payment(id, request.payment_amount)
        .await?
        .map(Json)
        .ok_or_else(ApiError::loan_not_found)
}
