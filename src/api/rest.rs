use std::convert::Infallible;
use std::sync::Arc;

use chrono::NaiveDate;
use warp::http::Uri;
use warp::Filter;

use crate::client::Transport;
use crate::controller::PageController;
use crate::form::{RegistrationForm, ReportForm};
use crate::view::pages;
use crate::view::View;

/// Largest form body accepted
const FORM_LIMIT: u64 = 64 * 1024;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct RestApi<T: Transport> {
    controller: Arc<PageController<T>>,
}

impl<T> RestApi<T>
where
    T: Transport + Send + Sync + 'static,
{
    pub fn new(controller: Arc<PageController<T>>) -> Self {
        RestApi { controller }
    }

    pub fn routes(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        self.index()
            .or(self.get_register())
            .or(self.post_register())
            .or(self.get_report())
            .or(self.post_report())
            .with(warp::trace::request())
    }

    fn index(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path::end()
            .and(warp::get())
            .map(|| warp::redirect::see_other(Uri::from_static("/register")))
    }

    fn get_register(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("register")
            .and(warp::get())
            .map(|| warp::reply::html(pages::register_page(&RegistrationForm::with_date(today()), None)))
    }

    fn post_register(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let controller = Arc::clone(&self.controller);

        warp::path!("register")
            .and(warp::post())
            .and(warp::body::content_length_limit(FORM_LIMIT))
            .and(warp::body::form())
            .and_then(move |form: RegistrationForm| {
                let controller = Arc::clone(&controller);
                async move {
                    let submitted = form.clone();
                    let today = today();
                    let outcome =
                        tokio::task::spawn_blocking(move || controller.register(&submitted, today)).await;

                    let html = match outcome {
                        Ok(outcome) => pages::register_page(&form, Some(&outcome)),
                        Err(err) => {
                            tracing::error!(error = %err, "registration task failed");
                            pages::failure_page(
                                View::Register,
                                "Something went wrong while processing the registration.",
                            )
                        }
                    };
                    Ok::<_, Infallible>(warp::reply::html(html))
                }
            })
    }

    fn get_report(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("report")
            .and(warp::get())
            .map(|| warp::reply::html(pages::report_page(&ReportForm::with_date(today()), None)))
    }

    fn post_report(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let controller = Arc::clone(&self.controller);

        warp::path!("report")
            .and(warp::post())
            .and(warp::body::content_length_limit(FORM_LIMIT))
            .and(warp::body::form())
            .and_then(move |form: ReportForm| {
                let controller = Arc::clone(&controller);
                async move {
                    let submitted = form.clone();
                    let today = today();
                    let outcome =
                        tokio::task::spawn_blocking(move || controller.lookup(&submitted, today)).await;

                    let html = match outcome {
                        Ok(outcome) => pages::report_page(&form, Some(&outcome)),
                        Err(err) => {
                            tracing::error!(error = %err, "report task failed");
                            pages::failure_page(
                                View::Report,
                                "Something went wrong while fetching the report.",
                            )
                        }
                    };
                    Ok::<_, Infallible>(warp::reply::html(html))
                }
            })
    }
}
