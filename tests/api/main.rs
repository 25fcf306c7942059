mod helpers;

mod health_check;
