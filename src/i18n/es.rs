use super::{CommandInfo, MessageKey};

pub(super) const COMMANDS: &[CommandInfo] = &[
    CommandInfo { name: "start", description: "Comienza a usar el asistente" },
    CommandInfo { name: "register", description: "Registra tu cuenta" },
    CommandInfo { name: "help", description: "Obtén ayuda y ejemplos" },
    CommandInfo { name: "balance", description: "Ver resumen financiero" },
    CommandInfo { name: "reminders", description: "Mostrar recordatorios pendientes" },
    CommandInfo { name: "profile", description: "Ver tu perfil" },
    CommandInfo { name: "upgrade", description: "Mejorar a Premium" },
    CommandInfo { name: "support", description: "Contactar soporte" },
];

pub(super) fn template(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let text = match key {
        RegisterStart => concat!(
            "🚀 *¡Bienvenido al Registro de OkanAssist AI!*\n\n",
            "Necesito algunos detalles para crear tu cuenta.\n\n",
            "📧 *Por favor, introduce tu dirección de correo electrónico:*\n",
            "(Esto se utilizará para vincular tu cuenta)\n\n",
            "Escribe /cancel para detener el registro en cualquier momento."
        ),
        ValidateEmail => concat!(
            "❌ Por favor, introduce una dirección de correo electrónico válida.\n",
            "Ejemplo: tu.email@ejemplo.com"
        ),
        RegisterFirstName => concat!(
            "✅ Email: {email}\n\n",
            "👤 *¿Cuál es tu nombre?*\n",
            "(Presiona /skip para usar: {first_name})"
        ),
        RegisterLastName => "👤 *¿Cuál es tu apellido?*\n(Presiona /skip para continuar)",
        RegisterTimezone => concat!(
            "🕒 *¿Cuál es tu zona horaria?*\n\n",
            "Puedes decir cosas como `Soy de Madrid`, `Londres`, `hora del Pacífico` o `GMT+2`.\n\n",
            "Esto es crucial para que los recordatorios sean precisos."
        ),
        RegisterConfirmation => concat!(
            "📋 *Por favor confirma tus datos:*\n\n",
            "📧 Email: {email}\n",
            "👤 Nombre: {first_name}"
        ),
        RegisterConfirmationWithTimezone => concat!(
            "\n🌐 Idioma: {language}\n",
            "🕒 Zona horaria: {timezone}  _(Lo interpretaré automáticamente)_\n\n",
            "Escribe /confirm para crear tu cuenta.\n\n\n",
            "Escribe /cancel para empezar de nuevo."
        ),
        InvalidConfirmation => {
            "❌ Respuesta inválida. Por favor escribe /confirm para crear tu cuenta o /cancel para empezar de nuevo."
        }
        RegisterCancelled => {
            "❌ Registro cancelado. Puedes empezar de nuevo en cualquier momento escribiendo /register."
        }
        RegistrationFailed => "❌ El registro falló: {reason}",
        RegistrationError => {
            "❌ El registro falló por un error técnico. Por favor intenta más tarde."
        }
        PaymentSuccess => {
            "✅ ¡Pago exitoso! Ahora tienes acceso premium. Escribe /profile para ver tu estado."
        }
        PaymentFailure => {
            "❌ El pago falló o fue cancelado. Por favor intenta de nuevo con /upgrade o contacta soporte si el problema persiste."
        }
        PortalReturn => concat!(
            "🔗 *Bienvenido de vuelta a OkanAssist!*\n\n",
            "Has regresado exitosamente del portal. ¿Cómo puedo asistirte hoy?\n\n",
            "Escribe /help para ver ejemplos."
        ),
        GenericError => {
            "❌ Ocurrió un error. Por favor intenta más tarde o contacta soporte si el problema persiste."
        }
        GenericDowntime => {
            "⚠️ El servicio está experimentando problemas. Por favor intenta más tarde o contacta soporte si el problema persiste."
        }
        SupportPrompt => concat!(
            "🛠️ *Modo Soporte*\n\n",
            "Por favor describe tu problema en detalle. Tu mensaje será enviado directamente a nuestro equipo de soporte.\n\n",
            "Escribe /cancel para salir del modo soporte."
        ),
        SupportMessage => concat!(
            "💬 *Solicitud de Soporte Recibida*\n\n",
            "¡Gracias por contactarnos! Nuestro equipo de soporte te responderá lo antes posible.\n\n",
            "Mientras tanto, puedes visitar nuestra página de preguntas frecuentes o consultar /help para más información."
        ),
        SupportCancelled => "Solicitud de soporte cancelada.",
        SupportUnavailable => {
            "❌ Lo sentimos, el sistema de soporte no está disponible en este momento. Por favor intenta más tarde."
        }
        HelpMessage => concat!(
            "🤖 *Ayuda del Bot OkanAssist*\n\n",
            "*💰 Transacciones*\n",
            "¡Puedes gestionar tus finanzas simplemente hablando conmigo!\n\n",
            "• *Registrar transacciones:* \"Gasté $25 en el almuerzo\", \"Recibí $3000 de salario\"\n",
            "• *Obtener resúmenes:* \"Muéstrame mis gastos de este mes\", \"¿Cuáles fueron mis ingresos de la semana pasada?\"\n",
            "• *Generar informes en PDF:* \"Necesito un informe de enero\", \"Genera un PDF de mis transacciones del mes pasado\"\n\n",
            "*⏰ Recordatorios*\n",
            "Organiza tu vida con recordatorios inteligentes.\n\n",
            "• *Crear recordatorios:* \"Recuérdame pagar las facturas mañana a las 3pm\"\n",
            "• *Ver recordatorios:* \"Muéstrame mis recordatorios urgentes\", \"¿Cuáles son mis tareas para hoy?\"\n",
            "• *Completar recordatorios:* \"Marcar los recordatorios de hoy como completados\", \"Eliminar todos los recordatorios\"\n\n",
            "*📄 Procesamiento de Documentos*\n",
            "• Envía una foto de un recibo para registrar un gasto automáticamente.\n",
            "• Envía un extracto bancario en PDF para importar transacciones en bloque.\n\n",
            "*🎯 Comandos*\n",
            "/start - Empezar o iniciar sesión\n",
            "/register - Crear tu cuenta\n",
            "/help - Mostrar este mensaje de ayuda\n",
            "/upgrade - Obtener acceso ilimitado\n",
            "/profile - Ver tu perfil\n",
            "/support - Contactar soporte\n\n",
            "¡Solo háblame de forma natural, yo te entiendo! 🎉"
        ),
        UserNotFound => "🔐 Usuario no encontrado. Por favor regístrate primero escribiendo /register.\n",
        RegisterFirst => {
            "🔐 ¡Necesitas registrarte primero para {feature}!\nEscribe /register para crear tu cuenta."
        }
        ProfileInfo => concat!(
            "👤 *Tu Perfil*\n\n",
            "📧 Email: {email}\n",
            "👤 Nombre: {name}\n",
            "🌐 Idioma: {language}\n",
            "💰 Moneda: {currency}\n",
            "⏰ Zona horaria: {timezone}\n",
            "🔗 URL de WebApp: {webapp_url}\n",
            "⭐ Premium: {premium_status}\n"
        ),
        ManageUrl => "🔗 [Gestiona tu suscripción aquí]({url})",
        AudioProcessed => "✅ ¡Audio procesado!",
        UnknownError => "Error desconocido",
    };
    Some(text)
}
