//! Global token-bucket rate limiting for the `/api` surface.
//!
//! Uses the `governor` crate. The quota applies to the whole API rather
//! than per route; the client IP (X-Forwarded-For aware) is only used for
//! logging rejected requests.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::LocalBoxFuture;
use governor::{Quota, RateLimiter};
use log::{debug, warn};

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Sustained requests per second across the API.
    pub req_per_second: u32,
    /// Burst capacity on top of the sustained rate.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            req_per_second: 100,
            burst_size: 10,
        }
    }
}

// Boxed closure keeps governor's generics out of the middleware signature.
struct RateLimitState {
    check_limit: Arc<dyn Fn() -> bool + Send + Sync>,
}

#[derive(Clone)]
pub struct RateLimit {
    state: Arc<RateLimitState>,
}

impl RateLimit {
    pub fn new(config: RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(config.req_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        let limiter = RateLimiter::direct(quota);
        let check_limit = Arc::new(move || limiter.check().is_ok());

        Self {
            state: Arc::new(RateLimitState { check_limit }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let state = self.state.clone();
        Box::pin(async move { Ok(RateLimitService { service, state }) })
    }
}

pub struct RateLimitService<S> {
    service: S,
    state: Arc<RateLimitState>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !(self.state.check_limit)() {
            let ip = client_ip(&req);
            warn!("rate limit exceeded for {}", ip);
            // AppError renders the same JSON body shape as the handlers.
            return Box::pin(async move { Err(AppError::RateLimitExceeded.into()) });
        }
        debug!("rate limit check passed");

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

/// Client IP, preferring X-Forwarded-For when running behind a proxy.
fn client_ip(req: &ServiceRequest) -> IpAddr {
    if let Some(forwarded) = req.headers().get("X-Forwarded-For") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                if let Ok(ip) = first.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_exhausted_then_refused() {
        let quota = Quota::per_second(NonZeroU32::MIN).allow_burst(
            NonZeroU32::new(2).unwrap(),
        );
        let limiter = RateLimiter::direct(quota);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[actix_web::test]
    async fn refusal_is_json_with_message() {
        use actix_web::{App, HttpResponse, body::to_bytes, http::StatusCode, test, web};

        let limit = RateLimit::new(RateLimitConfig {
            req_per_second: 1,
            burst_size: 1,
        });
        let app = test::init_service(
            App::new()
                .wrap(limit)
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let ok = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert_eq!(ok.status(), StatusCode::OK);

        let err = test::try_call_service(&app, test::TestRequest::get().uri("/ping").to_request())
            .await
            .expect_err("second request should be refused");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Rate limit exceeded");
    }

    #[test]
    fn zero_config_falls_back_to_minimum() {
        // must not panic
        let _ = RateLimit::new(RateLimitConfig {
            req_per_second: 0,
            burst_size: 0,
        });
    }
}
