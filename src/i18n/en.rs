use super::{CommandInfo, MessageKey};

pub(super) const COMMANDS: &[CommandInfo] = &[
    CommandInfo { name: "start", description: "Start using the assistant" },
    CommandInfo { name: "register", description: "Register your account" },
    CommandInfo { name: "help", description: "Get help and examples" },
    CommandInfo { name: "balance", description: "View financial summary" },
    CommandInfo { name: "reminders", description: "Show pending reminders" },
    CommandInfo { name: "profile", description: "View your profile" },
    CommandInfo { name: "upgrade", description: "Upgrade to Premium" },
    CommandInfo { name: "support", description: "Contact customer support" },
];

pub(super) fn template(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let text = match key {
        RegisterStart => concat!(
            "🚀 *Welcome to OkanAssist AI Registration!*\n\n",
            "I need a few details to create your account.\n\n",
            "📧 *Please enter your email address:*\n",
            "(This will be used to link your account)\n\n",
            "Type /cancel to stop registration anytime."
        ),
        ValidateEmail => "❌ Please enter a valid email address.\nExample: your.email@example.com",
        RegisterFirstName => concat!(
            "✅ Email: {email}\n\n",
            "👤 *What's your first name?*\n",
            "(Press /skip to use: {first_name})"
        ),
        RegisterLastName => "👤 *What's your last name?*\n(Press /skip to continue)",
        RegisterTimezone => concat!(
            "🕒 *What is your timezone?*\n\n",
            "You can say things like `I'm from New York`, `London`, `pacific time`, or `GMT+2`.\n\n",
            "This is crucial for reminders to be accurate."
        ),
        RegisterConfirmation => concat!(
            "📋 *Please confirm your details:*\n\n",
            "📧 Email: {email}\n",
            "👤 Name: {first_name}"
        ),
        RegisterConfirmationWithTimezone => concat!(
            "\n🌐 Language: {language}\n",
            "🕒 Timezone: {timezone}  _(I will interpret this automatically)_\n\n",
            "Type /confirm to create your account.\n\n\n",
            "Type /cancel to start over."
        ),
        InvalidConfirmation => {
            "❌ Invalid response. Please type /confirm to create your account or /cancel to start over."
        }
        RegisterCancelled => {
            "❌ Registration cancelled. You can start over anytime by typing /register."
        }
        RegistrationFailed => "❌ Registration failed: {reason}",
        RegistrationError => {
            "❌ Registration failed due to a technical error. Please try again later."
        }
        PaymentSuccess => {
            "✅ Payment successful! You now have premium access. Type /profile to check your status."
        }
        PaymentFailure => {
            "❌ Payment failed or was cancelled. Please try again with /upgrade or contact support if the issue persists."
        }
        PortalReturn => concat!(
            "🔗 *Welcome back to OkanAssist!*\n\n",
            "You have successfully returned from the portal. How can I assist you today?\n\n",
            "Type /help for examples!"
        ),
        GenericError => {
            "❌ An error occurred. Please try again later or contact support if the issue persists."
        }
        GenericDowntime => {
            "⚠️ The service is currently experiencing issues. Please try again later or contact support if the issue persists."
        }
        SupportPrompt => concat!(
            "🛠️ *Support Mode*\n\n",
            "Please describe your issue in detail. Your message will be sent directly to our support team.\n\n",
            "Type /cancel to exit support mode."
        ),
        SupportMessage => concat!(
            "💬 *Support Request Received*\n\n",
            "Thank you for reaching out! Our support team will get back to you as soon as possible.\n\n",
            "In the meantime, you can also visit our FAQ page or check out /help for more information."
        ),
        SupportCancelled => "Support request cancelled.",
        SupportUnavailable => {
            "❌ We're sorry, the support system is currently unavailable. Please try again later."
        }
        HelpMessage => concat!(
            "🤖 *OkanAssist Bot Help*\n\n",
            "*💰 Transactions*\n",
            "You can manage your finances just by talking to me!\n\n",
            "• *Log transactions:* \"Spent $25 on lunch\", \"Received $3000 salary\"\n",
            "• *Get summaries:* \"Show my spending this month\", \"What's my income for last week?\"\n",
            "• *Generate PDF reports:* \"I need a report for January\", \"Generate a PDF of my transactions from last month\"\n\n",
            "*⏰ Reminders*\n",
            "Organize your life with smart reminders.\n\n",
            "• *Create reminders:* \"Remind me to pay bills tomorrow at 3pm\"\n",
            "• *View reminders:* \"Show my urgent reminders\", \"What are my tasks for today?\"\n",
            "• *Complete reminders:* \"Mark today reminders as completed\", \"Clear last week's reminders\", \"Clear all reminders\"\n\n",
            "*📄 Document Processing*\n",
            "• Send a photo of a receipt to automatically log an expense.\n",
            "• Send a PDF bank statement for bulk transaction import.\n\n",
            "*🎯 Commands*\n",
            "/start - Get started or log in\n",
            "/register - Create your account\n",
            "/help - Show this help message\n",
            "/upgrade - Get unlimited access\n",
            "/profile - View your profile\n",
            "/support - Contact customer support\n\n",
            "Just talk to me naturally - I understand! 🎉"
        ),
        UserNotFound => "🔐 User not found. Please register first by typing /register.\n",
        RegisterFirst => {
            "🔐 You need to register first to {feature}!\nType /register to create your account."
        }
        ProfileInfo => concat!(
            "👤 *Your Profile*\n\n",
            "📧 Email: {email}\n",
            "👤 Name: {name}\n",
            "🌐 Language: {language}\n",
            "💰 Currency: {currency}\n",
            "⏰ Timezone: {timezone}\n",
            "🔗 WebApp URL: {webapp_url}\n",
            "⭐ Premium: {premium_status}\n"
        ),
        ManageUrl => "🔗 [Manage your subscription here]({url})",
        AudioProcessed => "✅ Audio processed!",
        UnknownError => "Unknown error",
    };
    Some(text)
}
