//! Account service: application-layer orchestration
//!
//! Registration, credential verification and rotation, and password-reset
//! issuance/redemption. Mail is a side channel: every dispatch is
//! best-effort and never changes the outcome of the operation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use validator::Validate;

use super::commands::{RedeemResetRequest, RegisterRequest, UpdateProfileRequest};
use super::password_policy::{enforce_password_policy, PasswordField};
use crate::application::notifications::{
    NotificationDispatcher, Outgoing, Template, TemplateKind, TemplateVars,
};
use crate::domain::{
    normalize_email, GlobalOptionsRepository, NewUser, SmtpSettings, User, UserChanges,
    UserRepositoryInterface,
};
use crate::infrastructure::crypto::{
    decode_reset_token_unverified, hash_password, issue_reset_token, verify_password,
    verify_reset_token, DUMMY_PASSWORD_HASH,
};
use crate::support::{DomainError, DomainResult, InfraError};

pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent";
pub const RESET_COMPLETED_MESSAGE: &str = "Your password has been reset";
pub const INVALID_RESET_TOKEN_MESSAGE: &str = "Token is not valid, please try again";

pub struct AccountService {
    users: Arc<dyn UserRepositoryInterface>,
    options: Arc<dyn GlobalOptionsRepository>,
    dispatcher: NotificationDispatcher,
    base_url: String,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepositoryInterface>,
        options: Arc<dyn GlobalOptionsRepository>,
        dispatcher: NotificationDispatcher,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            options,
            dispatcher,
            base_url: base_url.into(),
        }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user. The very first user becomes `ADMIN`.
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<User> {
        let options = self.options.get_options().await?;
        if !options.enable_registration {
            return Err(DomainError::ConfigurationDisabled(
                "Registration is disabled".into(),
            ));
        }

        let request = request.normalized();
        if request.email.is_empty() {
            return Err(DomainError::InvalidInput("Email is required".into()));
        }
        request.validate()?;

        if self.users.get_user_by_email(&request.email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        enforce_password_policy(&request.password, PasswordField::Password)?;

        // Parse before writing so a broken template cannot leave a half-done registration
        let notification = if options.user_registration_notification {
            Some(Template::for_kind(TemplateKind::Notification, &options)?)
        } else {
            None
        };

        let password_hash = hash_blocking(request.password).await?;

        let user = self
            .users
            .create_user(NewUser {
                email: request.email,
                name: request.name,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, role = %user.role, "New user registered");

        if let Some(template) = notification {
            self.notify_admins(&template, &options.smtp, &user).await;
        }

        Ok(user)
    }

    async fn notify_admins(
        &self,
        template: &Template,
        smtp: &SmtpSettings,
        new_user: &User,
    ) {
        let admins = match self.users.list_admins().await {
            Ok(admins) => admins,
            Err(e) => {
                warn!(error = %e, "Could not load admins for registration notice");
                return;
            }
        };

        let message = format!(
            "A new user has registered: {} ({})",
            new_user.name, new_user.email
        );

        let batch = admins
            .into_iter()
            .map(|admin| {
                let vars = TemplateVars::from([("name", admin.name), ("message", message.clone())]);
                Outgoing {
                    to: admin.email,
                    content: template.render(&vars),
                }
            })
            .collect();

        let report = self.dispatcher.dispatch_all(smtp, batch).await;
        debug!(sent = report.sent, failed = report.failed, "Registration notices dispatched");
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify an email/password pair and stamp the login time.
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);

        let found = self.users.get_user_by_email(&email).await?;

        // Unknown accounts still pay for one bcrypt verification
        let stored = found.as_ref().and_then(|u| u.password_hash.clone());
        let has_hash = stored.is_some();
        let hash = stored.unwrap_or_else(|| DUMMY_PASSWORD_HASH.to_string());
        let valid = verify_blocking(password.to_string(), hash).await && has_hash;

        let Some(mut user) = found.filter(|_| valid) else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let now = Utc::now();
        self.users.touch_last_login(&user.id, now).await?;
        user.last_login_at = now;

        info!(user_id = %user.id, "User authenticated");
        Ok(user)
    }

    // ── Profile ─────────────────────────────────────────────────

    /// The acting user's record.
    pub async fn me(&self, current_user_id: &str) -> DomainResult<User> {
        self.users
            .get_user_by_id(current_user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found("id", current_user_id))
    }

    /// Update email, name and/or password of the acting user.
    pub async fn update(
        &self,
        current_user_id: &str,
        request: UpdateProfileRequest,
    ) -> DomainResult<User> {
        let user = self.me(current_user_id).await?;

        let request = request.normalized();
        request.validate()?;

        let mut changes = UserChanges::default();

        if request.wants_password_change() {
            let (Some(password), Some(new_password), Some(repeat)) = (
                request.password,
                request.new_password,
                request.repeat_new_password,
            ) else {
                return Err(DomainError::InvalidInput(
                    "Password, new password and repeat new password are all required to change the password"
                        .into(),
                ));
            };

            enforce_password_policy(&new_password, PasswordField::NewPassword)?;

            let old_matches = match &user.password_hash {
                Some(hash) => verify_blocking(password, hash.clone()).await,
                None => false,
            };
            if !old_matches {
                return Err(DomainError::Unauthorized("Old password incorrect".into()));
            }

            if new_password != repeat {
                return Err(DomainError::InvalidInput("New passwords do not match".into()));
            }

            changes.password_hash = Some(hash_blocking(new_password).await?);
        }

        if let Some(email) = request.email.filter(|e| *e != user.email) {
            if let Some(other) = self.users.get_user_by_email(&email).await? {
                if other.id != user.id {
                    return Err(DomainError::Conflict("Email already exists".into()));
                }
            }
            changes.email = Some(email);
        }

        if let Some(name) = request.name.filter(|n| *n != user.name) {
            changes.name = Some(name);
        }

        if changes.is_empty() {
            return Ok(user);
        }

        let password_changed = changes.password_hash.is_some();
        let updated = self
            .users
            .update_user(&user.id, changes)
            .await?
            .ok_or_else(|| DomainError::user_not_found("id", current_user_id))?;

        info!(user_id = %updated.id, password_changed, "Profile updated");
        Ok(updated)
    }

    // ── Password reset ──────────────────────────────────────────

    /// Mail a reset link if the account exists. The reply is the same
    /// either way.
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<&'static str> {
        let options = self.options.get_options().await?;
        let template = Template::for_kind(TemplateKind::ForgotPassword, &options)?;

        let email = normalize_email(email);
        if email.is_empty() {
            return Err(DomainError::InvalidInput("Email is required".into()));
        }

        let Some(user) = self.users.get_user_by_email(&email).await? else {
            debug!("Password reset requested for unknown email");
            return Ok(RESET_REQUESTED_MESSAGE);
        };

        let Some(secret) = user.password_hash.as_deref() else {
            debug!(user_id = %user.id, "Password reset requested for user without credentials");
            return Ok(RESET_REQUESTED_MESSAGE);
        };

        let token = match issue_reset_token(&user.id, &user.email, secret) {
            Ok(token) => token,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Could not issue reset token");
                return Ok(RESET_REQUESTED_MESSAGE);
            }
        };

        let vars = TemplateVars::from([
            ("email", user.email.clone()),
            ("url", self.reset_url(&token)),
        ]);
        let outgoing = Outgoing {
            to: user.email.clone(),
            content: template.render(&vars),
        };

        if let Err(e) = self.dispatcher.dispatch(&options.smtp, &outgoing).await {
            warn!(user_id = %user.id, error = %e, "Password reset mail not delivered");
        } else {
            info!(user_id = %user.id, "Password reset link sent");
        }

        Ok(RESET_REQUESTED_MESSAGE)
    }

    fn reset_url(&self, token: &str) -> String {
        format!(
            "{}/login/forgotpassword?token={}",
            self.base_url.trim_end_matches('/'),
            token
        )
    }

    /// Redeem a reset token, storing `password` as the new credential.
    ///
    /// Failures past input validation are logged and reported as one
    /// generic message.
    pub async fn redeem_password_reset(
        &self,
        request: RedeemResetRequest,
    ) -> DomainResult<&'static str> {
        request.validate()?;

        if request.password != request.new_password {
            return Err(DomainError::InvalidInput("Passwords do not match".into()));
        }

        enforce_password_policy(&request.password, PasswordField::NewPassword)?;

        match self.apply_reset(&request.token, request.password).await {
            Ok(user_id) => {
                info!(user_id = %user_id, "Password reset redeemed");
                Ok(RESET_COMPLETED_MESSAGE)
            }
            Err(e) => {
                warn!(error = %e, "Password reset redemption failed");
                Err(DomainError::Unauthorized(INVALID_RESET_TOKEN_MESSAGE.into()))
            }
        }
    }

    async fn apply_reset(&self, token: &str, password: String) -> DomainResult<String> {
        let claims = decode_reset_token_unverified(token)
            .ok_or_else(|| DomainError::InvalidInput("Link not valid".into()))?;

        let user = self
            .users
            .get_user_by_id(&claims.sub)
            .await?
            .ok_or_else(|| DomainError::Internal("Something went wrong".into()))?;
        let secret = user
            .password_hash
            .as_deref()
            .ok_or_else(|| DomainError::Internal("Something went wrong".into()))?;

        let verified = verify_reset_token(token, secret)
            .map_err(|e| DomainError::Unauthorized(e.to_string()))?;
        if verified.sub != user.id || verified.email != user.email {
            return Err(DomainError::Unauthorized("Token subject mismatch".into()));
        }

        let changes = UserChanges {
            password_hash: Some(hash_blocking(password).await?),
            ..UserChanges::default()
        };
        self.users
            .update_user(&user.id, changes)
            .await?
            .ok_or_else(|| DomainError::user_not_found("id", &user.id))?;

        Ok(user.id)
    }
}

// ── Helpers ─────────────────────────────────────────────────────

async fn hash_blocking(password: String) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| DomainError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| DomainError::from(InfraError::from(e)))
}

/// A malformed stored hash counts as a mismatch.
async fn verify_blocking(password: String, hash: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            warn!(error = %e, "Stored credential hash could not be verified");
            false
        }
        Err(e) => {
            warn!(error = %e, "Verification task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::{GlobalOptions, UserRole};
    use crate::infrastructure::crypto::{issue_reset_token_at, RESET_TOKEN_TTL_MINUTES};
    use crate::infrastructure::{
        InMemoryOptionsRepository, InMemoryUserRepository, RecordingTransportFactory,
    };

    struct Harness {
        service: AccountService,
        users: Arc<InMemoryUserRepository>,
        mail: RecordingTransportFactory,
    }

    fn harness_with(options: GlobalOptions, mail: RecordingTransportFactory) -> Harness {
        let users = Arc::new(InMemoryUserRepository::new());
        let options = Arc::new(InMemoryOptionsRepository::new(options));
        let dispatcher = NotificationDispatcher::new(Arc::new(mail.clone()), "noreply@test");
        let service = AccountService::new(users.clone(), options, dispatcher, "https://app.test/");
        Harness {
            service,
            users,
            mail,
        }
    }

    fn harness() -> Harness {
        harness_with(GlobalOptions::default(), RecordingTransportFactory::new())
    }

    fn token_from(html: &str) -> String {
        let start = html.find("token=").expect("reset url in body") + "token=".len();
        html[start..]
            .split('"')
            .next()
            .expect("token terminated")
            .to_string()
    }

    fn redeem(token: &str, password: &str) -> RedeemResetRequest {
        RedeemResetRequest {
            token: token.to_string(),
            password: password.to_string(),
            new_password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_first_admin_then_users() {
        let h = harness();

        let ann = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();
        assert_eq!(ann.role, UserRole::Admin);

        let err = h
            .service
            .register(RegisterRequest::new("b@x.com", "abcdef", "Bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PolicyViolation(_)));

        let bob = h
            .service
            .register(RegisterRequest::new("b@x.com", "Abc123", "Bob"))
            .await
            .unwrap();
        assert_eq!(bob.role, UserRole::User);
        assert_eq!(h.users.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_any_case() {
        let h = harness();
        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        let err = h
            .service
            .register(RegisterRequest::new(" A@X.COM ", "Abc123", "Ann"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_blank_email_rejected() {
        let h = harness();

        for email in ["", "   "] {
            let err = h
                .service
                .register(RegisterRequest::new(email, "Abc123", "Ann"))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
        assert_eq!(h.users.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_me_and_update_unknown_user() {
        let h = harness();

        let err = h.service.me("no-such-user").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = h
            .service
            .update(
                "no-such-user",
                UpdateProfileRequest {
                    name: Some("Ghost".into()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_register_disabled() {
        let options = GlobalOptions {
            enable_registration: false,
            ..GlobalOptions::default()
        };
        let h = harness_with(options, RecordingTransportFactory::new());

        let err = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ConfigurationDisabled(_)));
        assert_eq!(h.users.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_notifies_admins_best_effort() {
        let options = GlobalOptions {
            user_registration_notification: true,
            ..GlobalOptions::default()
        };
        let h = harness_with(options, RecordingTransportFactory::failing_for(&["a@x.com"]));

        // The only admin's mailbox rejects delivery; registration still succeeds
        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();
        let bob = h
            .service
            .register(RegisterRequest::new("b@x.com", "Abc123", "Bob"))
            .await
            .unwrap();
        assert_eq!(bob.role, UserRole::User);
        assert!(h.mail.sent().is_empty());
    }

    #[tokio::test]
    async fn test_register_notification_content() {
        let options = GlobalOptions {
            user_registration_notification: true,
            ..GlobalOptions::default()
        };
        let h = harness_with(options, RecordingTransportFactory::new());

        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();
        h.service
            .register(RegisterRequest::new("b@x.com", "Abc123", "Bob"))
            .await
            .unwrap();

        let sent = h.mail.sent();
        let to_ann: Vec<_> = sent.iter().filter(|m| m.to == "a@x.com").collect();
        assert!(!to_ann.is_empty());
        let last = to_ann.last().unwrap();
        assert_eq!(last.from, "noreply@test");
        assert!(last.html.contains("Bob (b@x.com)"));
    }

    #[tokio::test]
    async fn test_register_malformed_template_creates_nothing() {
        let options = GlobalOptions {
            user_registration_notification: true,
            notification_template: Some("{ not json".into()),
            ..GlobalOptions::default()
        };
        let h = harness_with(options, RecordingTransportFactory::new());

        let err = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTemplate(_)));
        assert_eq!(h.users.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_stamps_last_login() {
        let h = harness();
        let ann = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        let err = h.service.authenticate("a@x.com", "Wrong1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        let err = h.service.authenticate("z@x.com", "Abc123").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let logged_in = h.service.authenticate("A@x.com", "Abc123").await.unwrap();
        assert!(logged_in.last_login_at >= ann.last_login_at);

        let stored = h.service.me(&ann.id).await.unwrap();
        assert_eq!(stored.last_login_at, logged_in.last_login_at);
    }

    #[tokio::test]
    async fn test_update_requires_all_password_fields() {
        let h = harness();
        let ann = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        let err = h
            .service
            .update(
                &ann.id,
                UpdateProfileRequest {
                    new_password: Some("New123".into()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_password_change() {
        let h = harness();
        let ann = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        let wrong_old = UpdateProfileRequest {
            password: Some("Nope12".into()),
            new_password: Some("New123".into()),
            repeat_new_password: Some("New123".into()),
            ..UpdateProfileRequest::default()
        };
        let err = h.service.update(&ann.id, wrong_old).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let mismatch = UpdateProfileRequest {
            password: Some("Abc123".into()),
            new_password: Some("New123".into()),
            repeat_new_password: Some("New124".into()),
            ..UpdateProfileRequest::default()
        };
        let err = h.service.update(&ann.id, mismatch).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let change = UpdateProfileRequest {
            password: Some("Abc123".into()),
            new_password: Some("New123".into()),
            repeat_new_password: Some("New123".into()),
            name: Some("Annie".into()),
            ..UpdateProfileRequest::default()
        };
        let updated = h.service.update(&ann.id, change).await.unwrap();
        assert_eq!(updated.name, "Annie");

        assert!(h.service.authenticate("a@x.com", "New123").await.is_ok());
        assert!(h.service.authenticate("a@x.com", "Abc123").await.is_err());
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        let h = harness();
        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();
        let bob = h
            .service
            .register(RegisterRequest::new("b@x.com", "Abc123", "Bob"))
            .await
            .unwrap();

        let err = h
            .service
            .update(
                &bob.id,
                UpdateProfileRequest {
                    email: Some("A@x.com".into()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_reset_unknown_email_is_indistinguishable() {
        let h = harness();
        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        let unknown = h.service.request_password_reset("ghost@x.com").await.unwrap();
        let known = h.service.request_password_reset("a@x.com").await.unwrap();

        assert_eq!(unknown, RESET_REQUESTED_MESSAGE);
        assert_eq!(known, unknown);
        assert_eq!(h.mail.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_mail_failure_is_masked() {
        let h = harness_with(GlobalOptions::default(), RecordingTransportFactory::unavailable());
        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        let reply = h.service.request_password_reset("a@x.com").await.unwrap();
        assert_eq!(reply, RESET_REQUESTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_reset_round_trip_rotates_token() {
        let h = harness();
        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        h.service.request_password_reset("a@x.com").await.unwrap();
        let sent = h.mail.sent();
        assert_eq!(sent[0].to, "a@x.com");
        assert!(sent[0].html.contains("https://app.test/login/forgotpassword?token="));
        let token = token_from(&sent[0].html);

        let reply = h
            .service
            .redeem_password_reset(redeem(&token, "Fresh1"))
            .await
            .unwrap();
        assert_eq!(reply, RESET_COMPLETED_MESSAGE);
        assert!(h.service.authenticate("a@x.com", "Fresh1").await.is_ok());

        // The credential changed, so the same token no longer verifies
        let err = h
            .service
            .redeem_password_reset(redeem(&token, "Again1"))
            .await
            .unwrap_err();
        match err {
            DomainError::Unauthorized(msg) => assert_eq!(msg, INVALID_RESET_TOKEN_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_token_invalidated_by_password_change() {
        let h = harness();
        let ann = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        h.service.request_password_reset("a@x.com").await.unwrap();
        let token = token_from(&h.mail.sent()[0].html);

        h.service
            .update(
                &ann.id,
                UpdateProfileRequest {
                    password: Some("Abc123".into()),
                    new_password: Some("New123".into()),
                    repeat_new_password: Some("New123".into()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await
            .unwrap();

        let err = h
            .service
            .redeem_password_reset(redeem(&token, "Fresh1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_redeem_expired_token() {
        let h = harness();
        let ann = h
            .service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();
        let secret = h
            .users
            .get_user_by_id(&ann.id)
            .await
            .unwrap()
            .and_then(|u| u.password_hash)
            .unwrap();

        let issued = Utc::now() - Duration::minutes(RESET_TOKEN_TTL_MINUTES + 1);
        let token = issue_reset_token_at(&ann.id, &ann.email, &secret, issued).unwrap();

        let err = h
            .service
            .redeem_password_reset(redeem(&token, "Fresh1"))
            .await
            .unwrap_err();
        match err {
            DomainError::Unauthorized(msg) => assert_eq!(msg, INVALID_RESET_TOKEN_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(h.service.authenticate("a@x.com", "Abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_redeem_token_for_unknown_user() {
        let h = harness();
        h.service
            .register(RegisterRequest::new("a@x.com", "Abc123", "Ann"))
            .await
            .unwrap();

        let token = issue_reset_token_at("no-such-user", "a@x.com", "some-secret", Utc::now())
            .unwrap();

        let err = h
            .service
            .redeem_password_reset(redeem(&token, "Fresh1"))
            .await
            .unwrap_err();
        match err {
            DomainError::Unauthorized(msg) => assert_eq!(msg, INVALID_RESET_TOKEN_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_redeem_input_errors() {
        let h = harness();

        let mismatch = RedeemResetRequest {
            token: "x".into(),
            password: "Fresh1".into(),
            new_password: "Fresh2".into(),
        };
        let err = h.service.redeem_password_reset(mismatch).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let weak = h
            .service
            .redeem_password_reset(redeem("x", "abcdef"))
            .await
            .unwrap_err();
        assert!(matches!(weak, DomainError::PolicyViolation(_)));

        let garbage = h
            .service
            .redeem_password_reset(redeem("not.a.token", "Fresh1"))
            .await
            .unwrap_err();
        match garbage {
            DomainError::Unauthorized(msg) => assert_eq!(msg, INVALID_RESET_TOKEN_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
