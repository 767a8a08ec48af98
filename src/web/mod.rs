pub mod admin;
pub mod submission;

/// Configures the web app by adding services from each web file.
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    admin::configure(conf);
    submission::configure(conf);
}
