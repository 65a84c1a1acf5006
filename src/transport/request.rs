use url::Url;

use crate::domain::{ApiKey, CaptchaTask, MinScore, TaskId};

fn push_json(params: &mut Vec<(String, String)>) {
    params.push(("json".to_owned(), "1".to_owned()));
}

fn push_key(params: &mut Vec<(String, String)>, key: &ApiKey) {
    params.push((ApiKey::FIELD.to_owned(), key.as_str().to_owned()));
}

pub fn encode_balance_query(key: &ApiKey) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_json(&mut params);
    params.push(("action".to_owned(), "getBalance".to_owned()));
    push_key(&mut params, key);
    params
}

pub fn encode_create_task_query(key: &ApiKey, task: &CaptchaTask) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_json(&mut params);

    match task {
        CaptchaTask::RecaptchaV2(v2) => {
            params.push(("method".to_owned(), "userrecaptcha".to_owned()));
            push_key(&mut params, key);
            params.push(("googlekey".to_owned(), v2.site_key().to_owned()));
            params.push(("pageurl".to_owned(), v2.page_url().to_owned()));
        }
        CaptchaTask::RecaptchaV3(v3) => {
            params.push(("method".to_owned(), "userrecaptcha".to_owned()));
            push_key(&mut params, key);
            params.push(("version".to_owned(), "v3".to_owned()));
            params.push(("googlekey".to_owned(), v3.site_key().to_owned()));
            params.push(("pageurl".to_owned(), v3.page_url().to_owned()));
            params.push(("action".to_owned(), v3.action().to_owned()));
            params.push((
                MinScore::FIELD.to_owned(),
                v3.min_score().as_str().to_owned(),
            ));
        }
        CaptchaTask::FunCaptcha(fun) => {
            params.push(("method".to_owned(), "funcaptcha".to_owned()));
            push_key(&mut params, key);
            params.push(("publickey".to_owned(), fun.public_key().to_owned()));
            params.push(("surl".to_owned(), fun.surl().to_owned()));
            params.push(("pageurl".to_owned(), fun.page_url().to_owned()));
        }
    }

    params
}

pub fn encode_solution_query(key: &ApiKey, task_id: &TaskId) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_json(&mut params);
    params.push(("action".to_owned(), "get".to_owned()));
    push_key(&mut params, key);
    params.push((TaskId::FIELD.to_owned(), task_id.as_str().to_owned()));
    params
}

/// Append percent-encoded query pairs to `endpoint`.
pub fn build_url(endpoint: &Url, params: &[(String, String)]) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut().extend_pairs(params);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("test_key").unwrap()
    }

    fn count(params: &[(String, String)], name: &str) -> usize {
        params.iter().filter(|(k, _)| k == name).count()
    }

    #[test]
    fn encode_balance_query_params() {
        assert_eq!(
            encode_balance_query(&key()),
            vec![
                ("json".to_owned(), "1".to_owned()),
                ("action".to_owned(), "getBalance".to_owned()),
                ("key".to_owned(), "test_key".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_recaptcha_v2_query_params() {
        let task = CaptchaTask::recaptcha_v2("6Le-wvkS", "https://example.com/login").unwrap();
        assert_eq!(
            encode_create_task_query(&key(), &task),
            vec![
                ("json".to_owned(), "1".to_owned()),
                ("method".to_owned(), "userrecaptcha".to_owned()),
                ("key".to_owned(), "test_key".to_owned()),
                ("googlekey".to_owned(), "6Le-wvkS".to_owned()),
                ("pageurl".to_owned(), "https://example.com/login".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_recaptcha_v3_query_params() {
        let task = CaptchaTask::recaptcha_v3(
            "6Le-wvkS",
            "https://example.com",
            "verify",
            MinScore::High,
        )
        .unwrap();
        let params = encode_create_task_query(&key(), &task);

        for name in [
            "method",
            "key",
            "version",
            "googlekey",
            "pageurl",
            "action",
            "min_score",
        ] {
            assert_eq!(count(&params, name), 1, "{name} in {params:?}");
        }
        assert!(params.contains(&("version".to_owned(), "v3".to_owned())));
        assert!(params.contains(&("min_score".to_owned(), "0.9".to_owned())));
    }

    #[test]
    fn encode_funcaptcha_query_params() {
        let task = CaptchaTask::fun_captcha(
            "69A21A01-CC7B-B9C6-0F9A-E7FA06677FFC",
            "https://client-api.arkoselabs.com",
            "https://example.com",
        )
        .unwrap();
        let params = encode_create_task_query(&key(), &task);

        assert!(params.contains(&("method".to_owned(), "funcaptcha".to_owned())));
        for name in ["publickey", "surl", "pageurl", "key"] {
            assert_eq!(count(&params, name), 1, "{name} in {params:?}");
        }
    }

    #[test]
    fn encode_solution_query_params() {
        let id = TaskId::new("abc123").unwrap();
        assert_eq!(
            encode_solution_query(&key(), &id),
            vec![
                ("json".to_owned(), "1".to_owned()),
                ("action".to_owned(), "get".to_owned()),
                ("key".to_owned(), "test_key".to_owned()),
                ("id".to_owned(), "abc123".to_owned()),
            ]
        );
    }

    #[test]
    fn build_url_percent_encodes_values() {
        let endpoint = Url::parse("https://2captcha.com/in.php").unwrap();
        let task =
            CaptchaTask::recaptcha_v2("site key", "https://example.com/a?b=c&d=e").unwrap();
        let url = build_url(&endpoint, &encode_create_task_query(&key(), &task));

        assert_eq!(
            url.as_str(),
            "https://2captcha.com/in.php?json=1&method=userrecaptcha&key=test_key\
             &googlekey=site+key&pageurl=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc%26d%3De"
        );
        let pageurl = url
            .query_pairs()
            .find(|(k, _)| k == "pageurl")
            .map(|(_, v)| v.into_owned());
        assert_eq!(pageurl.as_deref(), Some("https://example.com/a?b=c&d=e"));
    }
}
