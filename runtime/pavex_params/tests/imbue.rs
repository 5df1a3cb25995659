use std::sync::LazyLock;

use bytes::Bytes;
use http::Request;
use http_body_util::Full;
use jiff::Timestamp;

use pavex_params::request::path::PathVariables;
use pavex_params::{Fields, Imbue, ParamsConfig, get_params, parse_request};

async fn put_form(body: &'static str) -> pavex_params::Params {
    let request = Request::put("/test")
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap();
    let request = parse_request(request, &PathVariables::new(), &ParamsConfig::default())
        .await
        .unwrap();
    get_params(&request).unwrap().clone()
}

#[derive(Default)]
struct Listing {
    test: bool,
    keys: Vec<String>,
    values: Vec<i64>,
}

impl Imbue for Listing {
    fn fields() -> &'static Fields<Self> {
        static FIELDS: LazyLock<Fields<Listing>> = LazyLock::new(|| {
            Fields::<Listing>::new()
                .bool("Test", |l| &mut l.test)
                .strings("Keys", |l| &mut l.keys)
                .ints("Values", |l| &mut l.values)
        });
        &FIELDS
    }
}

#[tokio::test]
async fn scalars_and_comma_separated_lists() {
    let params = put_form("test=true&keys=this,that,something&values=1,2,3").await;

    let mut listing = Listing::default();
    params.imbue(&mut listing, &ParamsConfig::default());

    assert!(listing.test);
    assert_eq!(listing.keys, ["this", "that", "something"]);
    assert_eq!(listing.values, [1, 2, 3]);
}

#[derive(Default)]
struct Reminder {
    test: bool,
    created_at: Timestamp,
    remind_on: Option<Timestamp>,
}

impl Imbue for Reminder {
    fn fields() -> &'static Fields<Self> {
        static FIELDS: LazyLock<Fields<Reminder>> = LazyLock::new(|| {
            Fields::<Reminder>::new()
                .bool("Test", |r| &mut r.test)
                .time("CreatedAt", |r| &mut r.created_at)
                .optional_time("RemindOn", |r| &mut r.remind_on)
        });
        &FIELDS
    }
}

#[tokio::test]
async fn timestamps() {
    let params = put_form("test=true&created_at=2016-06-07T00:30Z&remind_on=2016-07-17").await;

    let mut reminder = Reminder::default();
    params.imbue(&mut reminder, &ParamsConfig::default());

    assert!(reminder.test);
    assert_eq!(
        reminder.created_at,
        "2016-06-07T00:30:00Z".parse::<Timestamp>().unwrap()
    );
    assert_eq!(
        reminder.remind_on,
        Some("2016-07-17T00:00:00Z".parse::<Timestamp>().unwrap())
    );
}
