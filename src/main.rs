#[macro_use]
extern crate rocket;

#[launch]
fn rocket() -> _ {
    wedding_rsvp::rocket()
}
