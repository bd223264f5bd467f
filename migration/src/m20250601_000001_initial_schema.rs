//! 初始表结构
//!
//! 创建 profiles / social_links / link_groups / links / visits / link_clicks 六张表。
//! link_clicks.link_id 不设外键：删除链接后历史点击保留，统计时显示为 "Unknown"。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // profiles（单例，由应用层保证只有一行）
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Profiles::Bio).text().null())
                    .col(ColumnDef::new(Profiles::Image).text().null())
                    .col(ColumnDef::new(Profiles::Banner).text().null())
                    .col(ColumnDef::new(Profiles::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SocialLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialLinks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SocialLinks::ProfileId).integer().not_null())
                    .col(
                        ColumnDef::new(SocialLinks::Platform)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SocialLinks::Url).text().not_null())
                    .col(
                        ColumnDef::new(SocialLinks::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_links_profile")
                            .from(SocialLinks::Table, SocialLinks::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LinkGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LinkGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LinkGroups::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(LinkGroups::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // links.group_id 是弱引用：删除分组前由应用层在同一事务内置空
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Links::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Links::Url).text().not_null())
                    .col(ColumnDef::new(Links::Icon).string_len(100).null())
                    .col(ColumnDef::new(Links::Image).text().null())
                    .col(ColumnDef::new(Links::Description).text().null())
                    .col(ColumnDef::new(Links::GroupId).integer().null())
                    .col(
                        ColumnDef::new(Links::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Links::StartDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Links::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Links::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_group_id")
                    .table(Links::Table)
                    .col(Links::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_sort_order")
                    .table(Links::Table)
                    .col(Links::SortOrder)
                    .to_owned(),
            )
            .await?;

        // visits（只追加）
        manager
            .create_table(
                Table::create()
                    .table(Visits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Visits::VisitedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_visited_at")
                    .table(Visits::Table)
                    .col(Visits::VisitedAt)
                    .to_owned(),
            )
            .await?;

        // link_clicks（只追加）
        manager
            .create_table(
                Table::create()
                    .table(LinkClicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LinkClicks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LinkClicks::LinkId).integer().not_null())
                    .col(
                        ColumnDef::new(LinkClicks::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 时间范围查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_link_clicks_clicked_at")
                    .table(LinkClicks::Table)
                    .col(LinkClicks::ClickedAt)
                    .to_owned(),
            )
            .await?;

        // 单链接时间序列查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_link_clicks_link_time")
                    .table(LinkClicks::Table)
                    .col(LinkClicks::LinkId)
                    .col(LinkClicks::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkClicks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Visits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LinkGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Profiles {
    #[sea_orm(iden = "profiles")]
    Table,
    Id,
    Name,
    Bio,
    Image,
    Banner,
    Email,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SocialLinks {
    #[sea_orm(iden = "social_links")]
    Table,
    Id,
    ProfileId,
    Platform,
    Url,
    SortOrder,
}

#[derive(DeriveIden)]
enum LinkGroups {
    #[sea_orm(iden = "link_groups")]
    Table,
    Id,
    Name,
    SortOrder,
}

#[derive(DeriveIden)]
enum Links {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    Title,
    Url,
    Icon,
    Image,
    Description,
    GroupId,
    IsActive,
    StartDate,
    EndDate,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Visits {
    #[sea_orm(iden = "visits")]
    Table,
    Id,
    VisitedAt,
}

#[derive(DeriveIden)]
enum LinkClicks {
    #[sea_orm(iden = "link_clicks")]
    Table,
    Id,
    LinkId,
    ClickedAt,
}
