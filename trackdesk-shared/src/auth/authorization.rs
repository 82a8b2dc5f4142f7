/// Authorization evaluator
///
/// Every protected operation is authorized by the same two-step procedure:
///
/// 1. Look up the capability a (resource, action) pair demands in a fixed,
///    exhaustive table ([`required_capability`]). The table is pure data;
///    adding a resource or action without extending it is a compile error.
/// 2. Check the acting user against the target with [`authorize`], which
///    resolves memberships and roles from the database.
///
/// Project listing is the one operation not gated here: its restriction is a
/// query-level filter (`Project::list_for_user`), so the table entry for it
/// only requires authentication.
///
/// # Capabilities
///
/// | Capability      | Meaning                                              |
/// |-----------------|------------------------------------------------------|
/// | `Authenticated` | Any logged-in user                                   |
/// | `Member`        | Holds a membership on the target project             |
/// | `Owner`         | Holds the owner role on the target project           |
/// | `Author`        | Is the target resource's author                      |
/// | `MemberAuthor`  | Is the author AND still a member of the project      |
///
/// # Example
///
/// ```no_run
/// use trackdesk_shared::auth::authorization::{authorize, Action, Resource, Target};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// authorize(
///     &pool,
///     user_id,
///     Resource::Project,
///     Action::Update,
///     &Target { project_id, author_id: None },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::{Membership, ProjectRole};

/// Resources the evaluator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A project
    Project,

    /// A project membership (collaborator record)
    Membership,

    /// An issue within a project
    Issue,

    /// A comment on an issue
    Comment,
}

/// Actions a request can perform on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new instance
    Create,

    /// Fetch a single instance
    Retrieve,

    /// Enumerate instances
    List,

    /// Modify an existing instance
    Update,

    /// Delete an existing instance
    Destroy,
}

/// The relationship a user must hold to the target for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any authenticated user
    Authenticated,

    /// Any member of the target project
    Member,

    /// An owner-role member of the target project
    Owner,

    /// The author of the target resource
    Author,

    /// The author of the target resource, who is also still a member
    MemberAuthor,
}

/// The capability table
///
/// Exhaustive over (Resource, Action). Pure data: no I/O, no request state.
pub fn required_capability(resource: Resource, action: Action) -> Capability {
    match (resource, action) {
        // Any authenticated user may create a project; listing is
        // restricted by the membership filter in the query itself.
        (Resource::Project, Action::Create) => Capability::Authenticated,
        (Resource::Project, Action::List) => Capability::Authenticated,
        (Resource::Project, Action::Retrieve) => Capability::Member,
        (Resource::Project, Action::Update) => Capability::Owner,
        (Resource::Project, Action::Destroy) => Capability::Owner,

        // Only owners manage collaborators; any member may see the roster.
        (Resource::Membership, Action::Create) => Capability::Owner,
        (Resource::Membership, Action::Destroy) => Capability::Owner,
        (Resource::Membership, Action::List) => Capability::Member,
        (Resource::Membership, Action::Retrieve) => Capability::Member,
        (Resource::Membership, Action::Update) => Capability::Owner,

        // Issues: members read and create, the author alone mutates.
        (Resource::Issue, Action::Create) => Capability::Member,
        (Resource::Issue, Action::List) => Capability::Member,
        (Resource::Issue, Action::Retrieve) => Capability::Member,
        (Resource::Issue, Action::Update) => Capability::Author,
        (Resource::Issue, Action::Destroy) => Capability::Author,

        // Comments: like issues, except mutation also requires the author
        // to still be a member of the project.
        (Resource::Comment, Action::Create) => Capability::Member,
        (Resource::Comment, Action::List) => Capability::Member,
        (Resource::Comment, Action::Retrieve) => Capability::Member,
        (Resource::Comment, Action::Update) => Capability::MemberAuthor,
        (Resource::Comment, Action::Destroy) => Capability::MemberAuthor,
    }
}

/// The target of an authorization decision
#[derive(Debug, Clone, Copy)]
pub struct Target {
    /// The project the resource belongs to
    pub project_id: Uuid,

    /// The resource's author, for author-gated operations
    ///
    /// None for operations whose capability never inspects authorship.
    pub author_id: Option<Uuid>,
}

impl Target {
    /// A target identified by project alone
    pub fn project(project_id: Uuid) -> Self {
        Self {
            project_id,
            author_id: None,
        }
    }

    /// A target with an author, for issues and comments
    pub fn authored(project_id: Uuid, author_id: Uuid) -> Self {
        Self {
            project_id,
            author_id: Some(author_id),
        }
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User is not a member of the project
    #[error("Not a member of project {0}")]
    NotMember(Uuid),

    /// User doesn't hold the owner role
    #[error("Requires the owner role on project {0}")]
    NotOwner(Uuid),

    /// User is not the author of the resource
    #[error("Not the author of this resource")]
    NotAuthor,

    /// Author-gated check was evaluated without an author on the target
    #[error("Authorization target is missing an author")]
    MissingAuthor,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Authorizes a user to perform an action on a resource
///
/// Looks up the required capability in the table and evaluates it against
/// the target, hitting the database only for membership-dependent checks.
///
/// # Errors
///
/// Returns an `AuthzError` variant describing the failed check. All of them
/// map to 403 Forbidden at the API boundary except `DatabaseError`.
pub async fn authorize(
    pool: &PgPool,
    user_id: Uuid,
    resource: Resource,
    action: Action,
    target: &Target,
) -> Result<(), AuthzError> {
    match required_capability(resource, action) {
        Capability::Authenticated => Ok(()),

        Capability::Member => require_membership(pool, target.project_id, user_id).await,

        Capability::Owner => {
            let role = Membership::get_role(pool, target.project_id, user_id)
                .await?
                .ok_or(AuthzError::NotMember(target.project_id))?;

            if role != ProjectRole::Owner {
                return Err(AuthzError::NotOwner(target.project_id));
            }

            Ok(())
        }

        Capability::Author => require_authorship(user_id, target),

        Capability::MemberAuthor => {
            require_membership(pool, target.project_id, user_id).await?;
            require_authorship(user_id, target)
        }
    }
}

/// Checks that a user holds a membership on a project
pub async fn require_membership(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    let is_member = Membership::has_member(pool, project_id, user_id).await?;

    if !is_member {
        return Err(AuthzError::NotMember(project_id));
    }

    Ok(())
}

fn require_authorship(user_id: Uuid, target: &Target) -> Result<(), AuthzError> {
    let author_id = target.author_id.ok_or(AuthzError::MissingAuthor)?;

    if user_id != author_id {
        return Err(AuthzError::NotAuthor);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_capabilities() {
        assert_eq!(
            required_capability(Resource::Project, Action::Create),
            Capability::Authenticated
        );
        assert_eq!(
            required_capability(Resource::Project, Action::List),
            Capability::Authenticated
        );
        assert_eq!(
            required_capability(Resource::Project, Action::Retrieve),
            Capability::Member
        );
        assert_eq!(
            required_capability(Resource::Project, Action::Update),
            Capability::Owner
        );
        assert_eq!(
            required_capability(Resource::Project, Action::Destroy),
            Capability::Owner
        );
    }

    #[test]
    fn test_membership_capabilities() {
        assert_eq!(
            required_capability(Resource::Membership, Action::Create),
            Capability::Owner
        );
        assert_eq!(
            required_capability(Resource::Membership, Action::Destroy),
            Capability::Owner
        );
        assert_eq!(
            required_capability(Resource::Membership, Action::List),
            Capability::Member
        );
        assert_eq!(
            required_capability(Resource::Membership, Action::Retrieve),
            Capability::Member
        );
    }

    #[test]
    fn test_issue_capabilities() {
        assert_eq!(
            required_capability(Resource::Issue, Action::Create),
            Capability::Member
        );
        assert_eq!(
            required_capability(Resource::Issue, Action::List),
            Capability::Member
        );
        assert_eq!(
            required_capability(Resource::Issue, Action::Retrieve),
            Capability::Member
        );
        assert_eq!(
            required_capability(Resource::Issue, Action::Update),
            Capability::Author
        );
        assert_eq!(
            required_capability(Resource::Issue, Action::Destroy),
            Capability::Author
        );
    }

    #[test]
    fn test_comment_capabilities() {
        assert_eq!(
            required_capability(Resource::Comment, Action::Create),
            Capability::Member
        );
        assert_eq!(
            required_capability(Resource::Comment, Action::Update),
            Capability::MemberAuthor
        );
        assert_eq!(
            required_capability(Resource::Comment, Action::Destroy),
            Capability::MemberAuthor
        );
    }

    #[test]
    fn test_mutation_is_never_open_to_plain_members() {
        // No Update or Destroy on any resource stops at bare membership.
        for resource in [
            Resource::Project,
            Resource::Membership,
            Resource::Issue,
            Resource::Comment,
        ] {
            for action in [Action::Update, Action::Destroy] {
                let cap = required_capability(resource, action);
                assert_ne!(cap, Capability::Member, "{:?} {:?}", resource, action);
                assert_ne!(cap, Capability::Authenticated, "{:?} {:?}", resource, action);
            }
        }
    }

    #[test]
    fn test_target_constructors() {
        let project_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let t = Target::project(project_id);
        assert_eq!(t.project_id, project_id);
        assert!(t.author_id.is_none());

        let t = Target::authored(project_id, author_id);
        assert_eq!(t.author_id, Some(author_id));
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::NotMember(Uuid::new_v4());
        assert!(err.to_string().contains("Not a member"));

        let err = AuthzError::NotOwner(Uuid::new_v4());
        assert!(err.to_string().contains("owner role"));

        let err = AuthzError::NotAuthor;
        assert!(err.to_string().contains("author"));
    }
}
