pub const POPUP_OVERLAY: &str = "fixed inset-0 z-50 flex items-center justify-center bg-black/50 backdrop-blur-sm px-4";
pub const POPUP_CARD: &str = "relative w-full max-w-lg bg-white dark:bg-gray-900 rounded-xl shadow-xl dark:shadow-[0_6px_20px_-6px_rgba(255,255,255,0.04)] p-8 border border-gray-200/50 dark:border-gray-700/50";
pub const POPUP_CLOSE: &str = "absolute top-3 right-3 p-2 text-gray-800 dark:text-white hover:text-blue-600 dark:hover:text-blue-400 rounded-lg transition-colors duration-200";
pub const CARD: &str = "bg-white dark:bg-gray-800 rounded-lg shadow-lg dark:shadow-[0_4px_12px_-4px_rgba(255,255,255,0.03)] p-6";
pub const BUTTON_PRIMARY: &str = "inline-flex items-center justify-center px-4 py-2 rounded-lg font-medium text-white bg-gradient-to-r from-blue-600 to-blue-700 hover:from-blue-700 hover:to-blue-800 shadow-lg hover:shadow-xl transition-all duration-300 disabled:opacity-50 disabled:cursor-not-allowed";
pub const BUTTON_SECONDARY: &str = "inline-flex items-center justify-center px-4 py-2 rounded-lg font-medium border border-gray-300 dark:border-gray-600 text-gray-900 dark:text-white hover:bg-gray-50 dark:hover:bg-gray-800";
pub const CHOICE_BASE: &str = "w-full text-left px-4 py-3 rounded-lg border-2 font-medium transition-all duration-200";
pub const CHOICE_NEUTRAL: &str = "border-gray-200 dark:border-gray-700 text-gray-900 dark:text-white hover:border-blue-400";
pub const CHOICE_SELECTED: &str = "border-blue-600 bg-blue-50 dark:bg-blue-900/40 text-blue-900 dark:text-blue-100";
pub const CHOICE_CORRECT: &str = "border-green-500 bg-green-50 dark:bg-green-900/50 text-green-700 dark:text-green-200";
pub const CHOICE_WRONG: &str = "border-red-500 bg-red-50 dark:bg-red-900/50 text-red-700 dark:text-red-200";
pub const CHOICE_LOCKED: &str = "cursor-default";
pub const INPUT: &str = "mt-2 block w-full rounded-lg border-0 bg-white dark:bg-gray-900 py-2 px-3 text-gray-900 dark:text-white shadow-sm ring-1 ring-inset ring-gray-300 dark:ring-gray-700 placeholder:text-gray-400 focus:ring-2 focus:ring-blue-600";
pub const FORM: &str = "mt-4 space-y-4";
pub const TEXT_H2: &str = "text-2xl font-bold text-gray-900 dark:text-white";
pub const TEXT_H3: &str = "text-xl font-bold text-gray-900 dark:text-white";
pub const TEXT_BODY: &str = "text-gray-600 dark:text-gray-300";
pub const TEXT_LABEL: &str = "block text-sm font-medium text-gray-900 dark:text-white";
pub const TEXT_HINT: &str = "text-xs text-gray-500 dark:text-gray-400 mt-1";
pub const ALERT_SUCCESS: &str = "bg-green-50 dark:bg-green-900/50 border border-green-200 dark:border-green-800 rounded-lg p-4 text-green-700 dark:text-green-200";
pub const ALERT_ERROR: &str = "bg-red-50 dark:bg-red-900/50 border border-red-200 dark:border-red-800 rounded-lg p-4 text-red-700 dark:text-red-200";
pub const ALERT_WARNING: &str = "p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 dark:bg-gray-900 dark:text-yellow-400";
pub const LOADING_SPINNER: &str = "animate-spin h-5 w-5 text-blue-600 dark:text-blue-400";
pub const POINTS_BADGE: &str = "inline-flex items-center gap-2 px-3 py-1 rounded-full bg-gradient-to-r from-yellow-400 to-orange-500 text-white font-semibold shadow";
