use actix_web::{get, HttpRequest, HttpResponse, Responder};

/// Relative paths of the stock board backgrounds shipped with the app.
const BACKGROUNDS: [&str; 8] = [
    "/assets/images/bg-mountains.jpg",
    "/assets/images/bg-night-sky.jpg",
    "/assets/images/bg-ocean.jpg",
    "/assets/images/bg-desert.jpg",
    "/assets/images/bg-forest.jpg",
    "/assets/images/bg-balloons.jpg",
    "/assets/images/bg-sakura.jpg",
    "/assets/images/bg-violet.jpg",
];

/// Relative paths of the stock board icons.
const ICONS: [&str; 8] = [
    "/assets/icons/project.svg",
    "/assets/icons/star.svg",
    "/assets/icons/loading.svg",
    "/assets/icons/puzzle.svg",
    "/assets/icons/container.svg",
    "/assets/icons/lightning.svg",
    "/assets/icons/colors.svg",
    "/assets/icons/hexagon.svg",
];

fn absolute_urls(req: &HttpRequest, paths: &[&str]) -> Vec<String> {
    let info = req.connection_info();
    let base = format!("{}://{}", info.scheme(), info.host());
    paths.iter().map(|path| format!("{}{}", base, path)).collect()
}

/// List the stock backgrounds as absolute URLs derived from the request host.
#[get("/backgrounds")]
pub async fn get_backgrounds(req: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(absolute_urls(&req, &BACKGROUNDS))
}

/// List the stock icons as absolute URLs derived from the request host.
#[get("/icons")]
pub async fn get_icons(req: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(absolute_urls(&req, &ICONS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_backgrounds_are_absolute_urls() {
        let app = test::init_service(
            actix_web::App::new().service(actix_web::web::scope("/assets").service(get_backgrounds)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/assets/backgrounds")
            .insert_header(("Host", "boards.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let urls: Vec<String> = test::read_body_json(resp).await;
        assert_eq!(urls.len(), BACKGROUNDS.len());
        for url in urls {
            assert!(
                url.starts_with("http://boards.example.com/assets/images/"),
                "unexpected url: {}",
                url
            );
        }
    }

    #[actix_rt::test]
    async fn test_icons_endpoint() {
        let app = test::init_service(
            actix_web::App::new().service(actix_web::web::scope("/assets").service(get_icons)),
        )
        .await;

        let req = test::TestRequest::get().uri("/assets/icons").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let urls: Vec<String> = test::read_body_json(resp).await;
        assert_eq!(urls.len(), ICONS.len());
    }
}
