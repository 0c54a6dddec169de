pub mod assets;
pub mod auth;
pub mod boards;
pub mod cards;
pub mod columns;
pub mod health;
pub mod profile;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh_access_token)
            .service(auth::verify_email)
            .service(auth::resend_verification)
            .service(auth::logout)
            .service(auth::google_auth)
            .service(auth::google_callback)
            .service(auth::need_help)
            .service(profile::update_profile)
            .service(profile::upload_avatar)
            .service(profile::get_avatar),
    )
    .service(
        web::scope("/boards")
            .service(boards::get_boards)
            .service(boards::create_board)
            .service(boards::update_board)
            .service(boards::delete_board),
    )
    .service(
        web::scope("/columns")
            .service(columns::create_column)
            .service(columns::get_columns)
            .service(columns::update_column)
            .service(columns::delete_column),
    )
    .service(
        web::scope("/cards")
            .service(cards::create_card)
            .service(cards::get_cards)
            .service(cards::update_card)
            .service(cards::delete_card),
    )
    .service(
        web::scope("/assets")
            .service(assets::get_backgrounds)
            .service(assets::get_icons),
    );
}
