use crate::{
    api::{attendance, auth, department, employee, health, meeting, report, task},
    auth::middleware::auth_middleware,
    config::Config,
    error::{json_config, path_config, query_config},
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Per-route limiter; `requests_per_min` tokens refill evenly over a minute
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond((60_000 / requests_per_min as u64).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    // one limiter shared by every protected scope
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config());

    cfg.service(
        web::scope(&config.api_prefix)
            // public
            .service(web::resource("/health").route(web::get().to(health::health)))
            .service(
                web::resource("/auth/login")
                    .wrap(login_limiter)
                    .route(web::post().to(auth::login)),
            )
            // Protected routes
            .service(
                web::scope("/attendance")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter.clone())
                    .service(web::resource("/checkin").route(web::post().to(attendance::check_in)))
                    .service(web::resource("/checkout").route(web::post().to(attendance::check_out)))
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(web::resource("/date/{date}").route(web::get().to(attendance::by_date)))
                    .service(web::resource("/employee/{id}").route(web::get().to(attendance::by_employee)))
                    .service(web::resource("/{id}").route(web::get().to(attendance::by_id))),
            )
            .service(
                web::scope("/employees")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter.clone())
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter.clone())
                    .service(web::resource("").route(web::get().to(department::list_departments))),
            )
            .service(
                web::scope("/meetings")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter.clone())
                    .service(
                        web::resource("")
                            .route(web::get().to(meeting::list_meetings))
                            .route(web::post().to(meeting::create_meeting)),
                    )
                    .service(web::resource("/upcoming").route(web::get().to(meeting::upcoming_meetings)))
                    .service(web::resource("/my-meetings").route(web::get().to(meeting::my_meetings)))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(meeting::get_meeting))
                            .route(web::put().to(meeting::update_meeting))
                            .route(web::delete().to(meeting::delete_meeting)),
                    )
                    .service(web::resource("/{id}/status").route(web::put().to(meeting::update_attendee_status))),
            )
            .service(
                web::scope("/tasks")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter.clone())
                    .service(
                        web::resource("")
                            .route(web::get().to(task::list_tasks))
                            .route(web::post().to(task::create_task)),
                    )
                    .service(web::resource("/my-tasks").route(web::get().to(task::my_tasks)))
                    .service(web::resource("/overdue").route(web::get().to(task::overdue_tasks)))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(task::get_task))
                            .route(web::put().to(task::update_task))
                            .route(web::delete().to(task::delete_task)),
                    )
                    .service(web::resource("/{id}/status").route(web::put().to(task::update_task_status))),
            )
            .service(
                web::scope("/reports")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter)
                    .service(web::resource("/attendance").route(web::get().to(report::attendance_report)))
                    .service(
                        web::resource("/attendance/export").route(web::get().to(report::export_attendance_report)),
                    )
                    .service(web::resource("/tasks").route(web::get().to(report::task_analytics)))
                    .service(web::resource("/tasks/export").route(web::get().to(report::export_task_analytics)))
                    .service(web::resource("/daily-attendance").route(web::get().to(report::daily_attendance)))
                    .service(
                        web::resource("/daily-attendance/export")
                            .route(web::get().to(report::export_daily_attendance)),
                    )
                    .service(
                        web::resource("/employee-performance").route(web::get().to(report::employee_performance)),
                    )
                    .service(
                        web::resource("/employee-performance/export")
                            .route(web::get().to(report::export_employee_performance)),
                    ),
            ),
    );
}
