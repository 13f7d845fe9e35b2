use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, Role},
        dashboard::{DashboardSummary, StatusCount},
        header::{LanguageList, MarkAllRead, NotificationList, SetLanguageRequest},
        labels::LabelList,
        orders::{Board, BoardColumn, CreateOrderRequest, MoveOrderRequest, MoveVia, OrderList, UpdateOrderRequest},
        services::{CategoryList, CreateServiceRequest, ServiceList, UpdateServiceRequest},
        team::{AssignOrderRequest, CreateMemberRequest, MemberList, UpdateMemberRequest},
        website::{FormPreview, ItemAdded, PublishedStore, PublishedStoreList, ToggleSectionRequest},
        workspace::{
            AttachLabelRequest, AttachmentList, CommentRequest, CostView, CustomerRequestPayload,
            DescriptionRequest, LogRequest, RequestStatusPayload, TimerAction, TimerActionRequest,
            TimerView, WorkspaceView,
        },
    },
    models::{
        AccountView, Label, MemberStatus, Notification, NotificationCategory, NotificationType,
        Order, OrderStatus, Priority, Service, TeamMember,
    },
    response::{ApiResponse, Meta},
    routes::{
        auth, dashboard, header, health, labels, orders, params, services, team, website,
        workspace,
    },
    stores::{
        header::Language,
        labels::NewLabel,
        website::{FormField, FormFieldInput, PreviewRow, SelectedSections, SocialLink, WebsiteDocument},
        workspace::{Attachment, Comment, CostSection, CustomerRequest, DeviceInfo, LogEntry, RequestStatus},
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::me,
        dashboard::summary,
        team::list_members,
        team::get_member,
        team::create_member,
        team::update_member,
        team::delete_member,
        orders::board,
        orders::create_board_order,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        orders::move_order,
        orders::assign_order,
        orders::unassign_order,
        workspace::get_workspace,
        workspace::set_cost,
        workspace::set_info,
        workspace::set_description,
        workspace::add_log_entry,
        workspace::add_comment,
        workspace::delete_comment,
        workspace::add_customer_request,
        workspace::set_request_status,
        workspace::get_timer,
        workspace::timer_action,
        workspace::list_attachments,
        workspace::upload_attachments,
        workspace::attachment_content,
        workspace::download_attachment,
        workspace::delete_attachment,
        workspace::attach_label,
        workspace::detach_label,
        labels::list_labels,
        labels::create_label,
        labels::delete_label,
        services::list_services,
        services::list_categories,
        services::get_service,
        services::create_service,
        services::update_service,
        services::delete_service,
        website::get_document,
        website::replace_section,
        website::set_selected_sections,
        website::toggle_section,
        website::add_item,
        website::update_item,
        website::remove_item,
        website::add_member_social,
        website::remove_member_social,
        website::add_field,
        website::update_field,
        website::remove_field,
        website::contact_preview,
        website::upload_image,
        website::publish,
        website::list_stores,
        website::get_store,
        header::list_notifications,
        header::mark_read,
        header::mark_all_read,
        header::dismiss,
        header::list_languages,
        header::set_language
    ),
    components(
        schemas(
            AccountView,
            TeamMember,
            MemberStatus,
            Order,
            OrderStatus,
            Service,
            Notification,
            NotificationType,
            NotificationCategory,
            Priority,
            Label,
            Language,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            Role,
            CreateMemberRequest,
            UpdateMemberRequest,
            AssignOrderRequest,
            MemberList,
            CreateOrderRequest,
            UpdateOrderRequest,
            MoveOrderRequest,
            MoveVia,
            OrderList,
            Board,
            BoardColumn,
            DashboardSummary,
            StatusCount,
            WorkspaceView,
            TimerView,
            TimerAction,
            TimerActionRequest,
            CostSection,
            CostView,
            DeviceInfo,
            DescriptionRequest,
            LogRequest,
            LogEntry,
            CommentRequest,
            Comment,
            CustomerRequestPayload,
            CustomerRequest,
            RequestStatusPayload,
            RequestStatus,
            Attachment,
            AttachmentList,
            AttachLabelRequest,
            NewLabel,
            LabelList,
            CreateServiceRequest,
            UpdateServiceRequest,
            ServiceList,
            CategoryList,
            WebsiteDocument,
            SelectedSections,
            SocialLink,
            FormField,
            FormFieldInput,
            PreviewRow,
            FormPreview,
            ItemAdded,
            PublishedStore,
            PublishedStoreList,
            ToggleSectionRequest,
            NotificationList,
            MarkAllRead,
            LanguageList,
            SetLanguageRequest,
            params::Pagination,
            params::SortOrder,
            health::HealthData,
            Meta,
            ApiResponse<Order>,
            ApiResponse<Board>,
            ApiResponse<TeamMember>,
            ApiResponse<WebsiteDocument>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Staff authentication"),
        (name = "Dashboard", description = "Workshop summary"),
        (name = "Team", description = "Team members"),
        (name = "Board", description = "Kanban board of repair orders"),
        (name = "Orders", description = "Repair orders and assignment"),
        (name = "Workspace", description = "Order detail sections, timer, attachments and labels"),
        (name = "Labels", description = "Order labels"),
        (name = "Services", description = "Service catalog"),
        (name = "Website", description = "Storefront builder and published stores"),
        (name = "Header", description = "Notifications and interface language"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
