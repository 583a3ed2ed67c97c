// Careers: applicant handler. Validates, logs and acknowledges applications.

pub mod handlers;
