//! Controllers referenced from `routes/`.

use std::sync::atomic::{AtomicU64, Ordering};

use routegen_runtime::{Call, DispatchError, HandlerResult};

#[derive(Default)]
pub struct UserController {
    next_id: AtomicU64,
}

impl UserController {
    pub fn list(&self, call: &mut Call, limit: i32, active: bool) -> HandlerResult {
        call.respond_text(200, format!("users limit={limit} active={active}"));
        Ok(())
    }

    pub fn show(&self, call: &mut Call, id: i64) -> HandlerResult {
        call.respond_text(200, format!("user {id}"));
        Ok(())
    }

    pub fn create(&self, call: &mut Call, name: String, admin: bool) -> HandlerResult {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        call.respond_json(
            201,
            format!(r#"{{"id":{id},"name":{name:?},"admin":{admin}}}"#),
        );
        Ok(())
    }

    pub fn remove(&self, call: &mut Call, id: i64) -> HandlerResult {
        if id <= 0 {
            return Err(DispatchError::status(422, format!("cannot delete user {id}")));
        }
        call.set_status(204);
        Ok(())
    }
}

#[derive(Default)]
pub struct BlogController;

impl BlogController {
    pub fn archive(&self, call: &mut Call, year: i32, month: i32, tag: String) -> HandlerResult {
        call.respond_text(200, format!("archive {year}-{month:02} tag={tag}"));
        Ok(())
    }

    pub fn post(&self, call: &mut Call, slug: String) -> HandlerResult {
        call.respond_text(200, format!("post {slug}"));
        Ok(())
    }
}

#[derive(Default)]
pub struct HealthController;

impl HealthController {
    pub fn check(&self, call: &mut Call) -> HandlerResult {
        call.respond_text(200, "ok");
        Ok(())
    }
}

pub mod shop {
    use routegen_runtime::{Call, HandlerResult};

    #[derive(Default)]
    pub struct PriceController;

    impl PriceController {
        pub fn quote(&self, call: &mut Call, amount: f64) -> HandlerResult {
            call.respond_text(200, format!("{amount:.2}"));
            Ok(())
        }
    }
}
