use super::{parse_api, request, Transport};
use crate::{
    error::{malformed, Error, Kind, Result},
    options::Options,
    types::UserInfo,
};

pub async fn fetch_user_info<T: Transport + ?Sized>(
    transport: &T,
    options: &Options,
    handle: &str,
) -> Result<UserInfo> {
    let fetch = async {
        let body = request(
            transport,
            &options.info_url,
            &[("handles", handle.to_string())],
            options.timeout(),
        )
        .await?;
        parse_api::<Vec<UserInfo>>(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| malformed("empty user list"))
    };
    fetch.await.map_err(|e| {
        Error::with_description(Kind::UserInfoUnavailable, handle.to_string()).caused_by(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::fake::{FakeTransport, Script};

    fn options() -> Options {
        Options {
            info_url: "info".into(),
            ..Options::default()
        }
    }

    #[tokio::test]
    async fn reads_first_user() {
        let t = FakeTransport::default().route(
            "info",
            Script::Reply(
                200,
                r#"{"status":"OK","result":[{"handle":"tourist","rating":3800,"maxRating":4000,"rank":"legendary grandmaster","titlePhoto":"p.jpg"}]}"#.into(),
            ),
        );
        let info = fetch_user_info(&t, &options(), "tourist").await.unwrap();
        assert_eq!(info.handle, "tourist");
        assert_eq!(info.max_rating, Some(4000));
    }

    #[tokio::test]
    async fn unrated_user_has_no_rating() {
        let t = FakeTransport::default().route(
            "info",
            Script::Reply(200, r#"{"status":"OK","result":[{"handle":"newbie"}]}"#.into()),
        );
        let info = fetch_user_info(&t, &options(), "newbie").await.unwrap();
        assert_eq!(info.rating, None);
    }

    #[tokio::test]
    async fn failures_are_user_info_unavailable() {
        let t = FakeTransport::default()
            .route("info", Script::Reply(200, r#"{"status":"OK","result":[]}"#.into()));
        assert_eq!(
            fetch_user_info(&t, &options(), "x").await.unwrap_err().kind(),
            &Kind::UserInfoUnavailable
        );
        let t = FakeTransport::default().route("info", Script::Fail);
        assert_eq!(
            fetch_user_info(&t, &options(), "x").await.unwrap_err().kind(),
            &Kind::UserInfoUnavailable
        );
    }
}
