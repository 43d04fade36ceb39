//! Convenience wrappers for common remote methods.
//!
//! Each wrapper forwards to [`BotClient::call`] with the camelCase wire
//! name. Any method not listed here is still reachable through
//! [`BotClient::call`].

use botrpc_core::Params;
use serde_json::Value;

use crate::client::BotClient;
use crate::error::BotError;

macro_rules! bot_methods {
    (
        without_params { $($bare:ident => $bare_wire:literal,)* }
        with_params { $($name:ident => $wire:literal,)* }
    ) => {
        impl BotClient {
            $(
                #[doc = concat!("Calls `", $bare_wire, "`.")]
                pub async fn $bare(&self) -> Result<Value, BotError> {
                    self.call($bare_wire, Params::new()).await
                }
            )*
            $(
                #[doc = concat!("Calls `", $wire, "`.")]
                pub async fn $name(&self, params: Params) -> Result<Value, BotError> {
                    self.call($wire, params).await
                }
            )*
        }

        /// `(rust name, wire name)` of every wrapper.
        pub const METHODS: &[(&str, &str)] = &[
            $((stringify!($bare), $bare_wire),)*
            $((stringify!($name), $wire),)*
        ];
    };
}

bot_methods! {
    without_params {
        get_me => "getMe",
        log_out => "logOut",
        close => "close",
        get_webhook_info => "getWebhookInfo",
        get_forum_topic_icon_stickers => "getForumTopicIconStickers",
    }
    with_params {
        get_updates => "getUpdates",
        set_webhook => "setWebhook",
        delete_webhook => "deleteWebhook",
        send_message => "sendMessage",
        forward_message => "forwardMessage",
        copy_message => "copyMessage",
        send_photo => "sendPhoto",
        send_audio => "sendAudio",
        send_document => "sendDocument",
        send_video => "sendVideo",
        send_animation => "sendAnimation",
        send_voice => "sendVoice",
        send_video_note => "sendVideoNote",
        send_media_group => "sendMediaGroup",
        send_location => "sendLocation",
        send_venue => "sendVenue",
        send_contact => "sendContact",
        send_poll => "sendPoll",
        send_dice => "sendDice",
        send_chat_action => "sendChatAction",
        send_sticker => "sendSticker",
        get_user_profile_photos => "getUserProfilePhotos",
        get_file => "getFile",
        ban_chat_member => "banChatMember",
        unban_chat_member => "unbanChatMember",
        restrict_chat_member => "restrictChatMember",
        promote_chat_member => "promoteChatMember",
        get_chat => "getChat",
        get_chat_administrators => "getChatAdministrators",
        get_chat_member_count => "getChatMemberCount",
        get_chat_member => "getChatMember",
        leave_chat => "leaveChat",
        pin_chat_message => "pinChatMessage",
        unpin_chat_message => "unpinChatMessage",
        set_chat_menu_button => "setChatMenuButton",
        set_my_commands => "setMyCommands",
        delete_my_commands => "deleteMyCommands",
        get_my_commands => "getMyCommands",
        edit_message_text => "editMessageText",
        edit_message_caption => "editMessageCaption",
        edit_message_media => "editMessageMedia",
        edit_message_reply_markup => "editMessageReplyMarkup",
        stop_poll => "stopPoll",
        delete_message => "deleteMessage",
        answer_callback_query => "answerCallbackQuery",
        answer_inline_query => "answerInlineQuery",
        answer_web_app_query => "answerWebAppQuery",
        send_invoice => "sendInvoice",
        answer_shipping_query => "answerShippingQuery",
        answer_pre_checkout_query => "answerPreCheckoutQuery",
    }
}
