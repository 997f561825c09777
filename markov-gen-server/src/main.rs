use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use clap::Parser;
use serde::Deserialize;
use markov_gen_core::{
	Direction, Extractor, GenerationInput, LineExtractor, LogSink, Markov, MarkovError, StartSeed, Token,
};

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_length: Option<usize>,
	backward: Option<bool>,
	seed: Option<String> // -> random / none, word:<w> or window:<w1> <w2>
}

#[derive(Deserialize)]
struct SeedsQuery {
	backward: Option<bool>
}

type SharedModel = RwLock<Markov>;

/// Largest step budget a request may ask for.
const MAX_LENGTH_LIMIT: usize = 1000;

impl GenerateParams {
	/// Determines the starting seed strategy for generation.
	fn start_seed(&self) -> Result<StartSeed, String> {
		match &self.seed {
			None => Ok(StartSeed::Random),
			Some(s) if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("random") => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase().starts_with("word:") => {
				let value = &s["word:".len()..];
				if value.contains(' ') {
					Err("Word seed cannot contain spaces".into())
				} else {
					Ok(StartSeed::Word(value.to_owned()))
				}
			}
			Some(s) if s.to_lowercase().starts_with("window:") => {
				let value = &s["window:".len()..];
				match value.split_once(' ') {
					Some((first, second)) if !second.contains(' ') => {
						Ok(StartSeed::Window(Token::from(first), Token::from(second)))
					}
					_ => Err("Window seed must be two words separated by one space".into()),
				}
			}
			Some(_) => Err("Seed must start with 'word:' or 'window:' or be 'random'".into()),
		}
	}

	fn generation_input(&self) -> Result<GenerationInput, String> {
		let defaults = GenerationInput::default();
		let max_length = self.max_length.unwrap_or(defaults.max_length);
		if max_length > MAX_LENGTH_LIMIT {
			return Err(format!("max_length cannot exceed {MAX_LENGTH_LIMIT}"));
		}
		Ok(GenerationInput {
			max_length,
			seed: self.start_seed()?,
			backward: self.backward.unwrap_or(defaults.backward),
		})
	}
}

fn error_response(error: MarkovError) -> HttpResponse {
	match error {
		MarkovError::UnknownSeed(_) => HttpResponse::NotFound().body(error.to_string()),
		MarkovError::EmptyCorpus => HttpResponse::Conflict().body(error.to_string()),
		_ => HttpResponse::InternalServerError().body(error.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a line from the shared model based on query parameters.
/// Returns the generated line as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedModel>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.generation_input() {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let model = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match model.generate(&input) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/feed`
///
/// Every line of the body is fed as one message.
#[put("/v1/feed")]
async fn put_feed(data: web::Data<SharedModel>, body: String) -> impl Responder {
	let mut model = match data.write() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match model.feed_lines(body.lines(), &LineExtractor::plain()) {
		Ok(fed) => HttpResponse::Ok().body(format!("{fed} messages fed")),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/seeds`
///
/// Lists the seed windows that do not touch a message boundary.
#[get("/v1/seeds")]
async fn get_seeds(data: web::Data<SharedModel>, query: web::Query<SeedsQuery>) -> impl Responder {
	let model = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let direction = Direction::from_backward(query.backward.unwrap_or(false));
	match model.available_seeds(direction) {
		Ok(seeds) => {
			let mut seeds: Vec<(Token, Token)> = seeds
				.into_iter()
				.filter(|(first, second)| !first.is_boundary() && !second.is_boundary())
				.collect();
			seeds.sort();
			HttpResponse::Ok().json(seeds)
		}
		Err(e) => error_response(e),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<SharedModel>) -> impl Responder {
	let model = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match model.stats() {
		Ok(stats) => HttpResponse::Ok().json(stats),
		Err(e) => error_response(e),
	}
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(put_feed)
		.service(get_seeds)
		.service(get_stats);
}

/// HTTP service generating text from a Markov chain held in memory.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
	/// Address to bind.
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to listen on.
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Worker threads (defaults to the number of CPUs).
	#[arg(long)]
	workers: Option<usize>,

	/// Log format of the `--corpus` files.
	#[arg(long, default_value = "plain")]
	extractor: Extractor,

	/// Log files fed before the server starts.
	#[arg(long)]
	corpus: Vec<PathBuf>,
}

fn load_model(config: &Config) -> Result<Markov, MarkovError> {
	let mut model = Markov::new().with_sink(Arc::new(LogSink));
	let extractor = config.extractor.compile()?;
	for path in &config.corpus {
		let fed = model.feed_file(path, &extractor)?;
		log::info!("{}: {fed} messages", path.display());
	}
	Ok(model)
}

/// Main entry point for the server.
///
/// Feeds the `--corpus` files, wraps the model in a `RwLock` so generations
/// share it while feeds get exclusive access, and starts an Actix-web server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();
	let config = Config::parse();

	let model = load_model(&config).map_err(std::io::Error::other)?;
	let shared_model = web::Data::new(RwLock::new(model));
	let workers = config.workers.unwrap_or_else(num_cpus::get);

	log::info!("listening on {}:{} with {workers} workers", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.configure(configure)
	})
		.workers(workers)
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test as actix_test;

	fn params(seed: Option<&str>) -> GenerateParams {
		GenerateParams { max_length: None, backward: None, seed: seed.map(str::to_owned) }
	}

	#[test]
	fn seed_parameter() {
		assert_eq!(params(None).start_seed(), Ok(StartSeed::Random));
		assert_eq!(params(Some("random")).start_seed(), Ok(StartSeed::Random));
		assert_eq!(params(Some("word:bar")).start_seed(), Ok(StartSeed::Word("bar".into())));
		assert_eq!(
			params(Some("window:bar baz")).start_seed(),
			Ok(StartSeed::Window(Token::from("bar"), Token::from("baz")))
		);
		assert!(params(Some("window:bar")).start_seed().is_err());
		assert!(params(Some("word:two words")).start_seed().is_err());
		assert!(params(Some("bar")).start_seed().is_err());
	}

	#[test]
	fn max_length_is_capped() {
		let mut query = params(None);
		assert_eq!(query.generation_input().unwrap().max_length, 30);
		query.max_length = Some(MAX_LENGTH_LIMIT);
		assert_eq!(query.generation_input().unwrap().max_length, MAX_LENGTH_LIMIT);
		query.max_length = Some(MAX_LENGTH_LIMIT + 1);
		assert!(query.generation_input().is_err());
	}

	fn shared(messages: &[&str]) -> web::Data<SharedModel> {
		web::Data::new(RwLock::new(Markov::from_messages(messages.iter().copied()).unwrap()))
	}

	#[actix_web::test]
	async fn generate_with_word_seed() {
		let app = actix_test::init_service(App::new().app_data(shared(&["foo bar baz qux"])).configure(configure)).await;
		let req = actix_test::TestRequest::get().uri("/v1/generate?seed=word:bar&backward=true").to_request();
		let body = actix_test::call_and_read_body(&app, req).await;
		assert_eq!(std::str::from_utf8(&body).unwrap(), "foo bar");
	}

	#[actix_web::test]
	async fn generate_error_statuses() {
		let app = actix_test::init_service(App::new().app_data(shared(&["foo bar baz qux"])).configure(configure)).await;

		let req = actix_test::TestRequest::get().uri("/v1/generate?seed=word:quux").to_request();
		assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

		let req = actix_test::TestRequest::get().uri("/v1/generate?seed=oops").to_request();
		assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = actix_test::TestRequest::get()
			.uri("/v1/generate?max_length=18446744073709551615")
			.to_request();
		assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let empty = actix_test::init_service(App::new().app_data(shared(&[])).configure(configure)).await;
		let req = actix_test::TestRequest::get().uri("/v1/generate").to_request();
		assert_eq!(actix_test::call_service(&empty, req).await.status(), StatusCode::CONFLICT);
	}

	#[actix_web::test]
	async fn feed_then_list_seeds() {
		let app = actix_test::init_service(App::new().app_data(shared(&[])).configure(configure)).await;

		let req = actix_test::TestRequest::put().uri("/v1/feed").set_payload("foo bar baz qux\n\n").to_request();
		let body = actix_test::call_and_read_body(&app, req).await;
		assert_eq!(std::str::from_utf8(&body).unwrap(), "1 messages fed");

		let req = actix_test::TestRequest::get().uri("/v1/seeds?backward=true").to_request();
		let seeds: Vec<(String, String)> = actix_test::call_and_read_body_json(&app, req).await;
		assert_eq!(
			seeds,
			vec![
				("bar".to_owned(), "foo".to_owned()),
				("baz".to_owned(), "bar".to_owned()),
				("qux".to_owned(), "baz".to_owned()),
			]
		);
	}

	#[actix_web::test]
	async fn stats_are_json() {
		let app = actix_test::init_service(App::new().app_data(shared(&["foo bar baz qux"])).configure(configure)).await;
		let req = actix_test::TestRequest::get().uri("/v1/stats").to_request();
		let stats: StatsBody = actix_test::call_and_read_body_json(&app, req).await;
		assert_eq!((stats.words, stats.real_words, stats.triples), (6, 4, 4));
	}

	#[derive(Deserialize)]
	struct StatsBody {
		words: usize,
		real_words: usize,
		triples: usize,
	}
}
